//! Name normalization shared by team lookups and slug handling

/// Title-case a string the way the scraped sources do it
///
/// A cased character that follows a non-cased one (space, digit, hyphen,
/// apostrophe, start of string) is uppercased; every other cased character is
/// lowercased. Note that this turns `76ers` into `76Ers`.
pub fn title_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_is_cased = false;

    for c in input.chars() {
        let is_cased = c.is_lowercase() || c.is_uppercase();
        if previous_is_cased {
            output.extend(c.to_lowercase());
        } else {
            output.extend(c.to_uppercase());
        }
        previous_is_cased = is_cased;
    }

    output
}

/// Normalize a free-text team name to the registry's display form
pub fn team_display_name(input: &str) -> String {
    title_case(&input.trim().replace('-', " ")).replace("76Ers", "76ers")
}

/// Turn a URL slug such as `luka-doncic` into a display name guess
pub fn name_from_slug(slug: &str) -> String {
    title_case(&slug.trim().trim_matches('/').replace('-', " "))
}
