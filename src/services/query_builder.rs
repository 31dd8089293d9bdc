const DEFAULT_THEME: &str = "culture";
const DEFAULT_AUDIENCE: &str = "travelers";

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Theme used when the request does not name one
    pub default_theme: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME.to_string(),
        }
    }
}

pub struct QueryBuilder {
    config: QueryConfig,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            config: QueryConfig::default(),
        }
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Build the ordered search queries for a trip.
    ///
    /// The four base queries always come first, followed by one query per
    /// non-blank inclusion hint. Capping the count is left to the aggregator.
    pub fn build_queries(
        &self,
        location: &str,
        theme: &str,
        personality: &str,
        inclusion_hints: &[String],
    ) -> Vec<String> {
        let location = sanitize(location);
        let theme = match sanitize(theme) {
            t if t.is_empty() => sanitize(&self.config.default_theme),
            t => t,
        };
        let personality = match sanitize(personality) {
            p if p.is_empty() => DEFAULT_AUDIENCE.to_string(),
            p => p,
        };

        let mut queries = vec![
            format!("{} attractions in {} city", theme, location),
            format!("{} themed experiences in {} city", theme, location),
            format!("{} locations in {} city", theme, location),
            format!("{} experience for {} in {} city", theme, personality, location),
        ];

        for hint in inclusion_hints {
            let hint = sanitize(hint);
            if hint.is_empty() {
                continue;
            }
            queries.push(format!("{} in {} related to {}", hint, location, theme));
        }

        queries
    }

    /// One targeted query per mentioned place name
    pub fn build_mention_query(&self, name: &str, location: &str) -> Option<String> {
        let name = sanitize(name);
        if name.is_empty() {
            return None;
        }
        Some(format!("{} in {}", name, sanitize(location)))
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace control characters with spaces and collapse whitespace runs.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
