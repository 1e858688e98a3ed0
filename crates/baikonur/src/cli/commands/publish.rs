//! Publish command - upload an artifact to AppGallery Connect

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use baikonur_stores::appgallery::{publish, AppGallery};
use baikonur_stores::{
    parse_submit_flag, Credentials, FileExtension, PublishConfig, SubmissionOutcome,
};

use crate::cli::ci_output::CiOutput;
use crate::cli::{output, Cli, OutputFormat};

/// Publish a build artifact to AppGallery Connect
///
/// All inputs can come from flags or from the environment, matching the
/// contract of the AppGallery publish workflow step. Results are surfaced
/// back to the CI host as `upload_status`, `appgallery_console_url` and
/// `errorMessage` outputs.
#[derive(Debug, Args)]
pub struct PublishCommand {
    /// AppGallery Connect API client ID
    #[arg(long, env = "HUAWEI_CLIENT_ID")]
    pub client_id: String,

    /// AppGallery Connect API client key
    #[arg(long, env = "HUAWEI_CLIENT_KEY", hide_env_values = true)]
    pub client_key: String,

    /// AppGallery app ID
    #[arg(long, env = "HUAWEI_APP_ID")]
    pub app_id: String,

    /// Artifact extension (apk, rpk, pdf, jpg, jpeg, png, bmp, mp4, mov, aab)
    #[arg(long, env = "HUAWEI_FILE_EXTENSION")]
    pub file_extension: FileExtension,

    /// Path to the artifact to upload
    #[arg(long, env = "HUAWEI_FILE_PATH")]
    pub file_path: PathBuf,

    /// File name to register (without extension)
    #[arg(long, env = "HUAWEI_FILE_NAME")]
    pub file_name: String,

    /// Submit for review after upload ("true", "1" or "yes" to opt in)
    #[arg(long, env = "HUAWEI_SUBMIT", default_value = "false")]
    pub submit: String,

    /// Override the Connect API base endpoint
    #[arg(long, hide = true, env = "HUAWEI_API_BASE")]
    pub api_base: Option<String>,
}

impl PublishCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(app_id = %self.app_id, "executing publish command");
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = PublishConfig {
            credentials: Credentials {
                client_id: self.client_id.clone(),
                client_secret: self.client_key.clone(),
            },
            app_id: self.app_id.clone(),
            file_extension: self.file_extension,
            file_path: self.file_path.clone(),
            file_name: self.file_name.clone(),
            submit: parse_submit_flag(&self.submit),
        };

        let client = match self.api_base {
            Some(ref base) => AppGallery::with_base_url(base.clone()),
            None => AppGallery::new(),
        };

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!();
            println!("{}", style("Publishing to AppGallery Connect...").bold());
            println!("{}", output::key_value("App", &self.app_id));
            println!(
                "{}",
                output::key_value("File", &self.file_path.display().to_string())
            );
            if config.submit {
                output::info("Will submit for review after upload");
            }
            println!();
        }

        let outputs = CiOutput::from_env();

        match publish(&client, &config).await {
            Ok(publication) => {
                outputs.set("upload_status", "success")?;
                outputs.set("appgallery_console_url", publication.console_url)?;

                if cli.format == OutputFormat::Json {
                    println!("{}", serde_json::to_string_pretty(&publication)?);
                } else if !cli.quiet {
                    output::success("Upload completed!");
                    println!("{}", output::key_value("File", &publication.file.file_name));
                    println!(
                        "{}",
                        output::key_value(
                            "Size",
                            &format!("{} bytes", publication.file.size_bytes)
                        )
                    );
                    println!("{}", output::key_value("Console", publication.console_url));
                    match publication.submission {
                        SubmissionOutcome::Submitted => {
                            output::success("Submitted for review");
                        }
                        SubmissionOutcome::Pending => {
                            output::warning(
                                "Package still compiling, submit again from the console in a few minutes",
                            );
                        }
                        SubmissionOutcome::NotRequested => {}
                    }
                }

                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                outputs.set("upload_status", "failed")?;
                outputs.set("errorMessage", &message)?;
                Err(err.into())
            }
        }
    }
}
