use crate::api::auth::Credentials;
use crate::cli::command_handlers::{
    ConfigHandler, DataHandler, OutputPrinter, SearchCommand, SearchHandler, TrackHandler,
};
use crate::cli::main_types::Commands;
use crate::core::client::ViSearch;
use crate::core::services::types::{ColorSearchParams, SearchParams};
use crate::display::OutputFormat;
use crate::error::ViSearchError;
use crate::storage::config::Config;
use crate::storage::credentials::resolve_credentials;
use crate::utils::logging::print_verbose;
use std::path::PathBuf;

/// Global options that every command sees
pub struct GlobalOptions {
    pub verbose: bool,
    pub config_path: Option<PathBuf>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>,
    pub format: OutputFormat,
}

pub struct Dispatcher {
    config: Config,
    options: GlobalOptions,
}

impl Dispatcher {
    pub fn new(config: Config, options: GlobalOptions) -> Self {
        Self { config, options }
    }

    fn log_verbose(&self, msg: &str) {
        print_verbose(self.options.verbose, msg);
    }

    /// Credentials and endpoint are only resolved for commands that talk to
    /// the API.
    fn create_client(&self) -> Result<ViSearch, ViSearchError> {
        let credentials: Credentials = resolve_credentials(
            self.options.access_key.clone(),
            self.options.secret_key.clone(),
        )?;
        let client_config = self
            .config
            .to_client_config(self.options.endpoint.as_deref())?;

        self.log_verbose(&format!(
            "Using endpoint {} (tracking {})",
            client_config.endpoint, client_config.tracking_endpoint
        ));
        ViSearch::new(credentials, client_config)
    }

    pub fn dispatch(mut self, command: Commands) -> Result<(), ViSearchError> {
        let printer = OutputPrinter::new(self.options.format);
        let verbose = self.options.verbose;

        match command {
            Commands::Config { command } => ConfigHandler::new().handle(
                command,
                &mut self.config,
                self.options.config_path.clone(),
                verbose,
            ),
            Commands::Insert { images, meta, param } => {
                self.log_verbose(&format!("Inserting {} image(s)", images.len()));
                let client = self.create_client()?;
                DataHandler::new().insert(&client, &printer, &images, &meta, &param)
            }
            Commands::InsertStatus {
                trans_id,
                error_page,
                error_limit,
            } => {
                let client = self.create_client()?;
                DataHandler::new().insert_status(
                    &client,
                    &printer,
                    &trans_id,
                    error_page,
                    error_limit,
                )
            }
            Commands::Remove { im_names } => {
                let client = self.create_client()?;
                DataHandler::new().remove(&client, &printer, &im_names)
            }
            Commands::Search { im_name, options } => {
                let params = SearchParams {
                    im_name,
                    base: options.to_base_params()?,
                };
                self.search(&printer, SearchCommand::Search(params))
            }
            Commands::Recommend { im_name, options } => {
                let params = SearchParams {
                    im_name,
                    base: options.to_base_params()?,
                };
                self.search(&printer, SearchCommand::Recommend(params))
            }
            Commands::ColorSearch { color, options } => {
                let params = ColorSearchParams {
                    color,
                    base: options.to_base_params()?,
                };
                self.search(&printer, SearchCommand::Color(params))
            }
            Commands::UploadSearch {
                upload,
                region,
                options,
            } => {
                let params = upload.to_upload_params(&region, &options)?;
                self.search(&printer, SearchCommand::Upload(params))
            }
            Commands::SimilarProducts {
                upload,
                region,
                options,
            } => {
                let params = upload.to_upload_params(&region, &options)?;
                self.search(&printer, SearchCommand::SimilarProducts(params))
            }
            Commands::Track {
                action,
                reqid,
                param,
            } => {
                let client = self.create_client()?;
                TrackHandler::new().handle(&client, &action, reqid.as_deref(), &param)
            }
        }
    }

    fn search(&self, printer: &OutputPrinter, command: SearchCommand) -> Result<(), ViSearchError> {
        let client = self.create_client()?;
        SearchHandler::new().handle(&client, printer, command, self.options.verbose)
    }
}
