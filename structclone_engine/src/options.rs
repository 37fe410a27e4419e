use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_MAX_DEPTH: usize = 2000;
pub const DEFAULT_DENSE_ARRAY_RATIO: u32 = 6;

pub const ENV_VAR_MAX_DEPTH: &str = "STRUCTCLONE_MAX_DEPTH";
pub const ENV_VAR_DENSE_ARRAY_RATIO: &str = "STRUCTCLONE_DENSE_RATIO";

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct SerializerOptions {
    /// Composites may nest this deep; one more is an input error.
    pub max_depth: usize,
    /// An array is written densely when
    /// `dense_array_ratio * property_count >= length`.
    pub dense_array_ratio: u32,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            dense_array_ratio: DEFAULT_DENSE_ARRAY_RATIO,
        }
    }
}

impl SerializerOptions {
    /// Defaults, overridden by whichever environment variables are set.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_depth: env_or(ENV_VAR_MAX_DEPTH, default.max_depth),
            dense_array_ratio: env_or(ENV_VAR_DENSE_ARRAY_RATIO, default.dense_array_ratio),
        }
    }

    pub fn should_serialize_densely(&self, length: u32, property_count: usize) -> bool {
        (self.dense_array_ratio as u64) * (property_count as u64) >= length as u64
    }
}

fn env_or<T: FromStr + Copy>(var: &str, default: T) -> T {
    match env::var(var) {
        Err(_) => default,
        Ok(s) => s.parse().unwrap_or_else(|_| {
            warn!(var, value = %s, "ignoring unparsable setting");
            default
        }),
    }
}
