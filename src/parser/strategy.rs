/// One way of pulling a value out of markup. `run` returns `None` when the
/// markup does not have the shape this strategy looks for.
pub struct Strategy<T> {
    pub name: &'static str,
    pub run: fn(&str) -> Option<T>,
}

/// Try strategies in order; the first `Some` wins. Returns the winner's name too.
pub fn first_success<T>(strategies: &[Strategy<T>], input: &str) -> Option<(&'static str, T)> {
    strategies
        .iter()
        .find_map(|s| (s.run)(input).map(|value| (s.name, value)))
}
