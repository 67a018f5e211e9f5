//! Search query builders
//!
//! Every pattern that interpolates a user token is built here, so the
//! interpolation rules can be tested without running any process.

/// A single `rg` content search
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub pattern: String,
    pub globs: Vec<String>,
    pub types: Vec<String>,
    pub extra_args: Vec<String>,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    /// Add a file glob filter (`-g`); repeated globs are all passed
    pub fn glob(mut self, glob: impl Into<String>) -> Self {
        self.globs.push(glob.into());
        self
    }

    /// Add a file type filter (`-t`)
    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.types.push(file_type.into());
        self
    }

    /// Add a raw flag passed through to `rg` unchanged
    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Case-insensitive matching
    pub fn ignore_case(self) -> Self {
        self.extra_arg("-i")
    }

    /// Emit matching file paths instead of lines
    pub fn files_with_matches(self) -> Self {
        self.extra_arg("-l")
    }

    /// Build `rg` arguments, searching `root`
    pub fn to_args(&self, root: &str) -> Vec<String> {
        let mut args = vec![
            "--line-number".to_string(),
            "--no-heading".to_string(),
            "--color".to_string(),
            "never".to_string(),
        ];
        for glob in &self.globs {
            args.push("-g".to_string());
            args.push(glob.clone());
        }
        for file_type in &self.types {
            args.push("-t".to_string());
            args.push(file_type.clone());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push("-e".to_string());
        args.push(self.pattern.clone());
        args.push(root.to_string());
        args
    }
}

/// A file listing (`rg --files`), optionally narrowed by a path regex
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileQuery {
    pub globs: Vec<String>,
    pub name_pattern: Option<String>,
}

impl FileQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glob(mut self, glob: impl Into<String>) -> Self {
        self.globs.push(glob.into());
        self
    }

    /// Keep only paths matching this regex
    pub fn named(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    pub fn to_args(&self, root: &str) -> Vec<String> {
        let mut args = vec!["--files".to_string()];
        for glob in &self.globs {
            args.push("-g".to_string());
            args.push(glob.clone());
        }
        args.push(root.to_string());
        args
    }
}

/// Token that must appear on the same line as one of several keywords,
/// in either order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeQuery {
    pub token: String,
    pub keywords: Vec<String>,
    pub globs: Vec<String>,
    pub types: Vec<String>,
}

impl CompositeQuery {
    pub fn new<I, S>(token: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            token: token.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            globs: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn glob(mut self, glob: impl Into<String>) -> Self {
        self.globs.push(glob.into());
        self
    }

    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.types.push(file_type.into());
        self
    }

    /// `(token).*(kw1|kw2)|(kw1|kw2).*(token)`
    pub fn pattern(&self) -> String {
        let keywords = self.keywords.join("|");
        format!(
            "({token}).*({keywords})|({keywords}).*({token})",
            token = self.token,
            keywords = keywords
        )
    }

    /// Query matching both orders of token and keyword
    pub fn primary(&self) -> SearchQuery {
        self.with_filters(SearchQuery::new(self.pattern()))
    }

    /// Token-only query used when the composite expression is unusable
    pub fn fallback(&self) -> SearchQuery {
        self.with_filters(SearchQuery::new(self.token.clone()))
    }

    fn with_filters(&self, mut query: SearchQuery) -> SearchQuery {
        query.globs = self.globs.clone();
        query.types = self.types.clone();
        query
    }
}
