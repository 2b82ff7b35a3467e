use std::sync::Arc;

use turnstile_auth_adapter_memory::AuthAdapterMemory;
use turnstile_core::GateConfig;
use turnstile_server::AppBuilder;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let config = match GateConfig::from_env() {
		Ok(config) => config,
		Err(err) => {
			tracing::error!("FATAL: {}", err);
			std::process::exit(1);
		}
	};

	let mut builder = AppBuilder::with_config(config);
	builder.auth_adapter(Arc::new(AuthAdapterMemory::new()));

	if let Err(err) = builder.run().await {
		tracing::error!("FATAL: {}", err);
		std::process::exit(1);
	}
}

// vim: ts=4
