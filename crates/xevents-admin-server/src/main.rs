use anyhow::Context;
use xevents_admin_server::{
    build_runnable_server, get_configuration, get_socket_address, initialize_tracing,
};
use xevents_shared::telemetry::{TraceFile, TRACE_FOLDER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let trace_file = TraceFile::create(TRACE_FOLDER, "xevents-admin")
        .context("failed to create file for traces")?;
    println!("Traces being written to: {:?}", trace_file.path);
    initialize_tracing("xevents_admin", "info", trace_file.file)?;

    let configuration = get_configuration().context("failed to read configuration")?;
    let addr = get_socket_address(&configuration.application)
        .context("failed to get socket address")?;
    let (server, port) = build_runnable_server(configuration, addr)
        .await
        .context("failed to initialize admin panel")?;
    println!("Admin panel listening on port {port}");
    server.run().await
}
