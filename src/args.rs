use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Expense and income tracking web application", long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = String::from(""), help = "The log directory e.g. '/var/logs'. If this is not provided, only logs out to stdout.")]
    pub base_log_dir: String,

    #[arg(
        long,
        env = "DATABASE_URL",
        default_value_t = String::from("sqlite:finboard.db"),
        help = "SQLite database URL that is compliant with sqlx SqlitePool e.g. 'sqlite:finboard.db'"
    )]
    pub database_url: String,

    #[arg(
        long,
        env = "JWT_SECRET",
        help = "Secret used to sign and verify bearer tokens"
    )]
    pub jwt_secret: String,

    #[arg(
        long,
        env = "CLASSIFIER_URL",
        default_value_t = String::from("https://api-inference.huggingface.co/models/facebook/bart-large-mnli"),
        help = "Zero-shot classification endpoint used for category suggestions"
    )]
    pub classifier_url: String,

    #[arg(
        long,
        env = "CLASSIFIER_API_KEY",
        help = "Bearer token for the classification endpoint"
    )]
    pub classifier_api_key: Option<String>,

    #[arg(
        long,
        default_value_t = 5u64,
        help = "Timeout in seconds for classification requests. On expiry the fallback category is returned."
    )]
    pub classifier_timeout: u64,

    #[arg(long)]
    pub port: u32,
}

pub fn parse_args() -> Args {
    return Args::parse();
}
