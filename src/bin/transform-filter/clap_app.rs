use clap::{
    arg,
    builder::{styling::AnsiColor, Styles},
    crate_description, crate_name, crate_version, value_parser, ColorChoice, Command,
};

fn env_no_color() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|x| !x.is_empty())
}

// Builds the application command line interface defining the arguments
pub fn build_app(interactive_output: bool) -> Command {
    let color_when = if interactive_output && !env_no_color() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Green.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default());

    Command::new(crate_name!())
    .styles(styles)
    .version(crate_version!())
    .about(crate_description!())
    .color(color_when)
    .arg(
        arg!([input] "JSON file holding the action result (reads stdin when omitted)")
        .long_help(
            "Path of the JSON document used as the action result. \
                    When omitted or set to \"-\" the document is read from the standard input.",
        ),
    )
    .arg(
        arg!(-c --config <FILE> "Filter configuration file (TOML)")
        .long_help(
            "TOML file describing the filter (default transformer, per-action transformers, \
                    query parameter names, envelopes and scope). Falls back to $TRANSFORM_FILTER_CONFIG. \
                    Without configuration no transformer applies and the input is printed back.",
        ),
    )
    .arg(
        arg!(-a --action <ID> "Identifier of the action that produced the result")
        .default_value("index"),
    )
    .arg(
        arg!(-q --query <QUERY> "Query string of the request (e.g. fields=id,title&includes=author)")
        .long_help(
            "URL encoded query string read for the shaping parameters \
                    (fields, includes and excludes unless renamed in the configuration).",
        ),
    )
    .arg(
        arg!(--head "Handle the request as a HEAD request (no body is produced)"),
    )
    .arg(
        arg!(-p --provider "Treat a JSON array input as a paginated data provider")
        .long_help(
            "Renders the input array as a collection (enveloped according to the configuration) \
                    instead of a single item.",
        ),
    )
    .arg(
        arg!(--page <N> "Page to extract from the provider (1 based)")
        .value_parser(value_parser!(u64).range(1..))
        .default_value("1")
        .requires("provider"),
    )
    .arg(
        arg!(--"page-size" <N> "Number of models per page (all of them when omitted)")
        .value_parser(value_parser!(u64).range(1..))
        .requires("provider"),
    )
    .arg(
        arg!(-v --verbose "Print debug traces of the filter decisions to stderr"),
    )
}
