use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUESTIONS_DRAWN: IntCounterVec = register_int_counter_vec!(
        "trivia_questions_drawn_total",
        "Number of questions handed out by the random selector",
        &["category"]
    )
    .unwrap();
}

/// Label used for draws made across all categories.
pub const ALL_CATEGORIES: &str = "all";

pub fn record_draw(category: Option<i64>) {
    let label = category.map(|id| id.to_string());
    QUESTIONS_DRAWN
        .with_label_values(&[label.as_deref().unwrap_or(ALL_CATEGORIES)])
        .inc();
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
