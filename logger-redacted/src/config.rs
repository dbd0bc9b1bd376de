// Logger configuration

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Raise the default level to debug
    pub verbose: bool,
    /// Force JSON output; `None` picks JSON when stderr is not a terminal
    pub json: Option<bool>,
    /// Crates whose events are shown by default (`RUST_LOG` overrides)
    pub targets: Vec<String>,
}

impl LoggerConfig {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub fn default_directives(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        let mut directives: Vec<String> = self
            .targets
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect();
        directives.push("reqwest=info".to_string());
        directives.push("hyper=warn".to_string());
        directives.join(",")
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            json: None,
            targets: vec![
                "certificate_fetcher".to_string(),
                "fetch_certs".to_string(),
                "signed_http".to_string(),
            ],
        }
    }
}
