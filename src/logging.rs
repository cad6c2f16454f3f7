use tracing::Level;
use tracing_subscriber::{
    filter::Targets,
    fmt::{
        self,
        format::{Format, Full},
        time::SystemTime,
    },
    prelude::*,
};

fn base_format() -> Format<Full, SystemTime> {
    fmt::format()
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
}

pub fn setup_logging(base_log_dir: &str) {
    let filter = Targets::new()
        .with_target("sqlx", Level::INFO)
        .with_target("hyper_util", Level::INFO)
        .with_target("reqwest", Level::INFO)
        .with_default(Level::DEBUG);

    let stdout_layer = fmt::layer().event_format(base_format().with_ansi(true));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer);

    if base_log_dir.is_empty() {
        subscriber.init();
        return;
    }

    let file_layer = fmt::layer()
        .event_format(base_format())
        .with_writer(tracing_appender::rolling::daily(base_log_dir, "finboard.log"));

    let json_layer = fmt::layer()
        .event_format(base_format().json())
        .with_writer(tracing_appender::rolling::daily(
            format!("{}/structured", base_log_dir),
            "finboard.log",
        ));

    subscriber.with(file_layer).with(json_layer).init();
}
