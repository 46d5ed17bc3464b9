use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(name = "firewatch", version, about = "Active wildfire dashboard")]
pub struct CliArgs {
    /// Print snapshot stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the fire API base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the fallback snapshot (file path or URL)
    #[arg(long, value_name = "PATH|URL")]
    pub fallback: Option<String>,

    /// Override the boundary GeoJSON file
    #[arg(long, value_name = "PATH")]
    pub boundary: Option<String>,

    /// Minutes between automatic refreshes
    #[arg(long = "refresh-minutes", value_name = "MINUTES")]
    pub refresh_minutes: Option<u64>,

    /// Skip the API and only read the fallback snapshot
    #[arg(long = "static-only")]
    pub static_only: bool,

    /// Days of detections to request from the API
    #[arg(long, value_name = "DAYS")]
    pub days: Option<u32>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("FIREWATCH_API_URL", url);
        }
        if let Some(fallback) = &self.fallback {
            std::env::set_var("FIREWATCH_FALLBACK", fallback);
        }
        if let Some(boundary) = &self.boundary {
            std::env::set_var("FIREWATCH_BOUNDARY", boundary);
        }
        if let Some(minutes) = self.refresh_minutes {
            std::env::set_var("FIREWATCH_REFRESH_MINUTES", minutes.to_string());
        }
        if let Some(days) = self.days {
            std::env::set_var("FIREWATCH_DAYS", days.to_string());
        }
        if self.static_only {
            std::env::set_var("FIREWATCH_STATIC_ONLY", "1");
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = CliArgs::parse_from([
            "firewatch",
            "--headless",
            "--json",
            "--static-only",
            "--refresh-minutes",
            "15",
            "--fallback",
            "https://example.org/active_fires.json",
        ]);
        assert!(args.headless && args.json && args.static_only);
        assert_eq!(args.refresh_minutes, Some(15));
        assert_eq!(
            args.fallback.as_deref(),
            Some("https://example.org/active_fires.json")
        );
    }

    #[test]
    fn help_lists_flags() {
        let help = CliArgs::help_text();
        assert!(help.contains("--static-only"));
        assert!(help.contains("--api-url"));
    }
}
