use energy_dashboard::logging;

#[test]
fn init_is_idempotent() {
    logging::init(true);
    logging::init(false);
    tracing::info!("logger installed");
}
