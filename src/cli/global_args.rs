use crate::app_home::APP_HOME;
use crate::cli::json_log_behaviour::JsonLogBehaviour;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;

#[derive(Args, Arbitrary, Clone, PartialEq, Debug, Default)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[clap(long, global = true)]
    pub debug: bool,

    /// Also write JSON logs to a timestamped file in the application directory
    #[clap(long, global = true)]
    pub json: bool,

    /// Write JSON logs to this file (implies --json)
    #[clap(long, global = true, value_name = "FILE")]
    pub log_file: Option<String>,
}

impl GlobalArgs {
    #[must_use]
    pub fn log_level(&self) -> Level {
        if self.debug { Level::DEBUG } else { Level::INFO }
    }

    #[must_use]
    pub fn json_log_behaviour(&self) -> JsonLogBehaviour {
        if let Some(path) = &self.log_file {
            return JsonLogBehaviour::File(PathBuf::from(path));
        }
        if self.json {
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            return JsonLogBehaviour::File(
                APP_HOME.logs_dir().join(format!("imgtools-{stamp}.jsonl")),
            );
        }
        JsonLogBehaviour::None
    }
}

impl ToArgs for GlobalArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if self.debug {
            args.push("--debug".into());
        }
        if self.json {
            args.push("--json".into());
        }
        if let Some(path) = &self.log_file {
            args.push("--log-file".into());
            args.push(path.into());
        }
        args
    }
}
