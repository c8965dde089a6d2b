//! Field name to map key policies.

/// Maps a field name to the key it is stored under.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, name: &str) -> String;
}

/// Uses the field name unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsIs;

/// `maxPlayers` and `max_players` become `max-players`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KebabCase;

/// `maxPlayers` and `max-players` become `max_players`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCase;

impl KeyGenerator for AsIs {
    fn generate(&self, name: &str) -> String {
        name.to_string()
    }
}

impl KeyGenerator for KebabCase {
    fn generate(&self, name: &str) -> String {
        split_words(name).join("-")
    }
}

impl KeyGenerator for SnakeCase {
    fn generate(&self, name: &str) -> String {
        split_words(name).join("_")
    }
}

impl<F> KeyGenerator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn generate(&self, name: &str) -> String {
        self(name)
    }
}

/// Lowercased words of a camelCase, snake_case or kebab-case name.
///
/// A word ends before an uppercase letter that follows a lowercase one,
/// before the last capital of an acronym followed by lowercase letters,
/// at every letter/digit change, and at `_`, `-` or whitespace.
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = chars[index - 1];
            let next = chars.get(index + 1).copied();
            let boundary = (prev.is_lowercase() && ch.is_uppercase())
                || (prev.is_uppercase()
                    && ch.is_uppercase()
                    && next.is_some_and(char::is_lowercase))
                || (prev.is_alphabetic() && ch.is_numeric())
                || (prev.is_numeric() && ch.is_alphabetic());
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(ch.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
