use std::fs::File;
use std::io::{IsTerminal, Read};

use crate::{bootstrap::BootStrap, clap_app};
use clap::ArgMatches;
use serde_json::Value;
use transform_filter::{
    error::*,
    filter::TransformFilter,
    request::QueryRequest,
    result::{ActionResult, DataProvider},
};

pub struct App {
    pub matches: ArgMatches,
}

impl App {
    pub fn new() -> Result<Self> {
        #[cfg(windows)]
        let _ = nu_ansi_term::enable_ansi_support();

        let interactive_output = std::io::stdout().is_terminal();

        Ok(App {
            matches: Self::matches(interactive_output)?,
        })
    }

    pub fn matches(interactive_output: bool) -> Result<ArgMatches> {
        Ok(clap_app::build_app(interactive_output).get_matches())
    }

    /// Reads the JSON document from the input file or the standard input
    fn read_input(&self) -> Result<Value> {
        let mut content = String::new();
        match self.matches.get_one::<String>("input").map(|s| s.as_str()) {
            Some(path) if path != "-" => {
                File::open(path)?.read_to_string(&mut content)?;
            }
            _ => {
                std::io::stdin().read_to_string(&mut content)?;
            }
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Builds the action result, slicing the requested page when the input is a provider
    fn build_result(&self, input: Value) -> Result<ActionResult> {
        if !self.matches.get_flag("provider") {
            return Ok(ActionResult::Data(input));
        }

        let Value::Array(models) = input else {
            return Err(Error::ArgsProcessingError(
                "A provider input must be a JSON array".to_string(),
            ));
        };

        let page = self.matches.get_one::<u64>("page").copied().unwrap_or(1);
        let per_page = self.matches.get_one::<u64>("page-size").copied();
        Ok(DataProvider::paginate(models, page, per_page).into())
    }

    /// Builds the request out of the query string and the HEAD flag
    fn build_request(&self) -> QueryRequest {
        self.matches
            .get_one::<String>("query")
            .map(|query| QueryRequest::from_query(query))
            .unwrap_or_default()
            .head(self.matches.get_flag("head"))
    }

    /// Start the application, bootstraps the configuration and runs the input through the filter.
    ///
    pub fn start(&self) -> Result<()> {
        let bootstrap = BootStrap::new(
            self.matches.get_one::<String>("config").map(|s| s.as_str()),
            self.matches.get_flag("verbose"),
        )?;
        let filter = TransformFilter::new(bootstrap.into_config());

        let action = self
            .matches
            .get_one::<String>("action")
            .map(|s| s.as_str())
            .unwrap_or("index");
        let result = self.build_result(self.read_input()?)?;
        let request = self.build_request();

        if let Some(payload) = filter.after_action(action, &request, result)?.into_payload() {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }

        Ok(())
    }
}
