use clap::{Parser, Subcommand};

/// A campaign desk for tracking the voting intentions of delegates.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The desk file in JSON format. Every section that is not present in the file
    /// is taken from the built-in seed data. See the manual of the delegate_desk crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (user id, default: the first user of the desk) The user on whose behalf the command runs. Only the
    /// chambers, delegates and results in the scope of this user are shown.
    #[clap(short, long, value_parser)]
    pub user: Option<String>,

    /// (date YYYY-MM-DD, default: today) The date used to compute the days since the last contact.
    #[clap(long, value_parser)]
    pub as_of: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the output will be written in JSON format to the given
    /// location. It is written to the standard output otherwise.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file in JSON format. If provided, campaign-desk will
    /// check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// The status breakdown and the weighted vote projection.
    Dashboard,
    /// The visible chambers, with the votes entered for the active period.
    Chambers {
        /// Case-insensitive search on the name and the city.
        #[clap(long, value_parser)]
        search: Option<String>,
    },
    /// The visible delegates.
    Delegates {
        /// Case-insensitive search on the name, the chamber and the tendency.
        #[clap(long, value_parser)]
        search: Option<String>,
        /// (CERTAIN, UNDECIDED, RISKY or NEGATIVE)
        #[clap(long, value_parser)]
        status: Option<String>,
        /// (faction id)
        #[clap(long, value_parser)]
        group: Option<String>,
    },
    /// The historical results and the vote trend of each faction.
    Results,
    /// Applies a list of actions and prints the resulting audit log.
    Apply {
        /// (file path) A JSON array of actions.
        #[clap(value_parser)]
        actions: String,
    },
    /// Asks the report service for a strategic analysis of the visible data.
    Analyze {
        /// (default gemini-3-pro-preview) The model to use.
        #[clap(long, value_parser)]
        model: Option<String>,
    },
}
