use tracing_indicatif::{filter::IndicatifFilter, IndicatifLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs the global subscriber: formatted logs on stderr, filtered by
/// `level` (any `EnvFilter` directive), with progress bars drawn underneath.
///
/// Only spans carrying an `indicatif.pb_show` field get a bar.
pub fn init_tracing(level: &str) {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .try_init();
}
