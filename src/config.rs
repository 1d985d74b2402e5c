// Copyright 2025 Sqlweave Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parameter resolver configuration
//!

/// Default name under which a scalar root parameter is exposed
pub const DEFAULT_PARAM_KEY: &str = "param";

/// Configuration options for [`Resolver`](crate::params::Resolver)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Name a non-container root value is bound to
    /// Default: "param"
    pub default_param_key: String,

    /// Memoize dotted-path lookups for the lifetime of the resolver
    /// Default: true
    pub cache_paths: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_param_key: DEFAULT_PARAM_KEY.to_string(),
            cache_paths: true,
        }
    }
}

impl ResolverConfig {
    /// Creates a new ResolverConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the default parameter key
    pub fn with_default_param_key(mut self, key: impl Into<String>) -> Self {
        self.default_param_key = key.into();
        self
    }

    /// Builder method to enable/disable path caching
    pub fn with_cache_paths(mut self, enabled: bool) -> Self {
        self.cache_paths = enabled;
        self
    }
}
