use inquire::{
    CustomUserError,
    autocompletion::{Autocomplete, Replacement},
};
use weather_lookup_core::places;

const MAX_SUGGESTIONS: usize = 10;

/// Autocompletes Thai province names.
#[derive(Debug, Clone, Default)]
pub struct ProvinceCompleter;

impl Autocomplete for ProvinceCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(places::suggest(input, MAX_SUGGESTIONS)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion
            .or_else(|| places::suggest(input, 1).first().map(|s| s.to_string())))
    }
}
