use crate::api::auth::mask_secret;
use crate::api::models::PagedSearchResult;
use crate::api::params::RequestParams;
use crate::cli::main_types::{ConfigCommands, RegionArgs, SearchArgs, UploadArgs};
use crate::core::services::traits::{DataOperations, SearchOperations, TrackOperations};
use crate::core::services::types::{
    BaseSearchParams, BoundingBox, ColorSearchParams, Image, SearchParams, UploadSearchParams,
};
use crate::display::{OperationStatus, OutputFormat, TableDisplay, display_status, render_json};
use crate::error::{CliError, ViSearchError};
use crate::storage::config::{ClientConfig, Config};
use crate::storage::credentials::{get_access_key, get_secret_key};
use crate::utils::logging::print_verbose;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Split a `key=value` argument.
pub fn parse_key_value(arg: &str) -> Result<(String, String), CliError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidArguments(format!(
            "'{}' is not in key=value form",
            arg
        ))),
    }
}

fn parse_params(args: &[String]) -> Result<RequestParams, CliError> {
    args.iter().map(|arg| parse_key_value(arg)).collect()
}

impl SearchArgs {
    pub fn to_base_params(&self) -> Result<BaseSearchParams, CliError> {
        let fq = self
            .fq
            .iter()
            .map(|arg| parse_key_value(arg))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(BaseSearchParams {
            page: self.page,
            limit: self.limit,
            fl: self.fl.clone(),
            fq,
            score: self.score,
            score_min: self.score_min,
            score_max: self.score_max,
            get_all_fl: self.get_all_fl,
            qinfo: false,
            facets: self.facets.clone(),
            facets_limit: self.facets_limit,
            facets_show_count: self.facets_show_count,
            dedup: self.dedup,
            custom: parse_params(&self.param)?,
        })
    }
}

impl UploadArgs {
    pub fn to_upload_params(
        &self,
        region: &RegionArgs,
        options: &SearchArgs,
    ) -> Result<UploadSearchParams, ViSearchError> {
        let mut params = match (&self.image, &self.url, &self.im_id) {
            (Some(path), _, _) => UploadSearchParams::from_file(path.clone()),
            (None, Some(url), _) => UploadSearchParams::from_url(url.clone()),
            (None, None, Some(im_id)) => UploadSearchParams::from_im_id(im_id.clone()),
            (None, None, None) => {
                return Err(CliError::InvalidArguments(
                    "one of --image, --url or --im-id is required".to_string(),
                )
                .into());
            }
        };
        params.bounding_box = region
            .bounding_box
            .as_deref()
            .map(str::parse::<BoundingBox>)
            .transpose()?;
        params.detection = region.detection.clone();
        params.base = options.to_base_params()?;
        Ok(params)
    }
}

/// Prints results as a table or as JSON
pub struct OutputPrinter {
    format: OutputFormat,
    display: TableDisplay,
}

impl OutputPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            display: TableDisplay::new(),
        }
    }

    pub fn print<T, F>(&self, value: &T, render_table: F) -> Result<(), CliError>
    where
        T: Serialize,
        F: FnOnce(&TableDisplay, &T) -> String,
    {
        let output = match self.format {
            OutputFormat::Json => render_json(value)?,
            OutputFormat::Table => render_table(&self.display, value),
        };
        println!("{}", output);
        Ok(())
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config: &mut Config,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Result<(), ViSearchError> {
        match command {
            ConfigCommands::Show => {
                print_verbose(verbose, "Attempting config show command");

                let defaults = ClientConfig::default();
                let show = |value: Option<String>, default: String| match value {
                    Some(v) => v,
                    None => format!("{} (default)", default),
                };

                println!("Current Configuration:");
                println!("=====================");
                println!(
                    "Endpoint: {}",
                    config
                        .get_endpoint()
                        .unwrap_or_else(|| "(not set)".to_string())
                );
                println!(
                    "Tracking Endpoint: {}",
                    show(config.tracking_endpoint.clone(), defaults.tracking_endpoint)
                );
                println!(
                    "Connect Timeout: {}s",
                    show(
                        config.connect_timeout_secs.map(|v| v.to_string()),
                        defaults.connect_timeout_secs.to_string()
                    )
                );
                println!(
                    "Read Timeout: {}s",
                    show(
                        config.read_timeout_secs.map(|v| v.to_string()),
                        defaults.read_timeout_secs.to_string()
                    )
                );
                println!(
                    "Max Connections: {}",
                    show(
                        config.max_connections.map(|v| v.to_string()),
                        defaults.max_connections.to_string()
                    )
                );
                println!(
                    "Max Connections Per Route: {}",
                    show(
                        config.max_connections_per_route.map(|v| v.to_string()),
                        defaults.max_connections_per_route.to_string()
                    )
                );

                println!(
                    "\nAccess Key: {}",
                    get_access_key()
                        .map(|k| mask_secret(&k))
                        .unwrap_or_else(|| "(not set)".to_string())
                );
                println!(
                    "Secret Key: {}",
                    get_secret_key()
                        .map(|k| mask_secret(&k))
                        .unwrap_or_else(|| "(not set)".to_string())
                );

                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                print_verbose(
                    verbose,
                    &format!("Attempting config set - key: {}, value: {}", key, value),
                );

                if key == "endpoint" || key == "tracking_endpoint" {
                    crate::utils::validation::validate_endpoint(&value)?;
                }
                config.set(&key, &value)?;
                config.save(config_path)?;

                display_status(&format!("Set {} to: {}", key, value), OperationStatus::Success);
                println!("Configuration saved successfully.");
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct DataHandler;

impl DataHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn insert(
        &self,
        client: &dyn DataOperations,
        printer: &OutputPrinter,
        images: &[String],
        meta: &[String],
        param: &[String],
    ) -> Result<(), ViSearchError> {
        let metadata = meta
            .iter()
            .map(|arg| parse_key_value(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let images = images
            .iter()
            .map(|arg| -> Result<Image, CliError> {
                let (im_name, im_url) = parse_key_value(arg)?;
                Ok(metadata
                    .iter()
                    .fold(Image::new(im_name, im_url), |image, (k, v)| {
                        image.with_metadata(k.clone(), v.clone())
                    }))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let trans = client.insert_with_params(&images, &parse_params(param)?)?;
        printer.print(&trans, |display, trans| display.render_insert_trans(trans))?;
        Ok(())
    }

    pub fn insert_status(
        &self,
        client: &dyn DataOperations,
        printer: &OutputPrinter,
        trans_id: &str,
        error_page: Option<u32>,
        error_limit: Option<u32>,
    ) -> Result<(), ViSearchError> {
        let status = client.insert_status_with_errors(trans_id, error_page, error_limit)?;
        printer.print(&status, |display, status| {
            display.render_insert_status(status)
        })?;
        Ok(())
    }

    pub fn remove(
        &self,
        client: &dyn DataOperations,
        printer: &OutputPrinter,
        im_names: &[String],
    ) -> Result<(), ViSearchError> {
        let status = client.remove(im_names)?;
        printer.print(&status, |_, status| {
            format!(
                "Removed {} image(s)",
                status.total.unwrap_or(im_names.len() as u32)
            )
        })?;
        Ok(())
    }
}

/// Which search endpoint a command targets
pub enum SearchCommand {
    Search(SearchParams),
    Recommend(SearchParams),
    Color(ColorSearchParams),
    Upload(UploadSearchParams),
    SimilarProducts(UploadSearchParams),
}

#[derive(Default)]
pub struct SearchHandler;

impl SearchHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        client: &dyn SearchOperations,
        printer: &OutputPrinter,
        command: SearchCommand,
        verbose: bool,
    ) -> Result<(), ViSearchError> {
        let render = |display: &TableDisplay, result: &PagedSearchResult| {
            display.render_search_result(result)
        };

        match command {
            SearchCommand::Search(params) => {
                print_verbose(verbose, &format!("Searching by im_name '{}'", params.im_name));
                printer.print(&client.search(&params)?, render)?;
            }
            SearchCommand::Recommend(params) => {
                print_verbose(
                    verbose,
                    &format!("Fetching recommendations for '{}'", params.im_name),
                );
                printer.print(&client.recommendation(&params)?, render)?;
            }
            SearchCommand::Color(params) => {
                print_verbose(verbose, &format!("Searching by color '{}'", params.color));
                printer.print(&client.color_search(&params)?, render)?;
            }
            SearchCommand::Upload(params) => {
                print_verbose(verbose, &format!("Upload search with {:?}", params.source));
                printer.print(&client.upload_search(&params)?, render)?;
            }
            SearchCommand::SimilarProducts(params) => {
                print_verbose(
                    verbose,
                    &format!("Similar products search with {:?}", params.source),
                );
                let result = client.similar_products_search(&params)?;
                printer.print(&result, |display, result| {
                    display.render_group_result(result)
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct TrackHandler;

impl TrackHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        client: &dyn TrackOperations,
        action: &str,
        reqid: Option<&str>,
        param: &[String],
    ) -> Result<(), ViSearchError> {
        let mut params = RequestParams::new();
        params.insert("action", action).insert_opt("reqid", reqid);
        params.extend(parse_params(param)?);

        client.send_event(&params)?;
        display_status(&format!("Sent '{}' event", action), OperationStatus::Success);
        Ok(())
    }
}
