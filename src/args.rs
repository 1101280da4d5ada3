use clap::Parser;

/// Converts a survey folder into a LimeSurvey tab separated structure file.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (folder path) The survey folder. It must contain `<name>.csv` with the questions,
    /// `listAnswers/` with the answer lists and `texts/` with the welcome and end messages,
    /// where `<name>` is the name of the folder.
    #[clap(value_parser)]
    pub folder: String,

    /// (directory path, default `config`) The directory holding the survey configurations,
    /// one `<name>.json` file per survey.
    #[clap(long, value_parser, default_value = "config")]
    pub config_dir: String,

    /// (file path, optional) A JSON file replacing the built-in LimeSurvey headers and
    /// default rows.
    #[clap(long, value_parser)]
    pub global_config: Option<String>,

    /// (file path, optional) Where to write the structure file. Defaults to
    /// `<folder>/<name>_to_import.txt`.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) A previously generated structure file. If provided, surveytsv
    /// checks that the output is identical and prints the differences otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
