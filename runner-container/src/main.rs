use anyhow::{Context, Result};
use greeter_core::config::{InvalidEventPolicy, load_config};
use greeter_core::errors::{GreeterError, PayloadError};
use greeter_core::greeter::{Response, handle_value};
use greeter_core::telemetry::{InvocationStats, init_tracing};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

/// This is the entry point for invoking the greeter outside of Lambda, e.g. in
/// a container or from a shell pipeline.
///
/// What it does at a high-level:
///     Load config (first argument, else `GREETER_CONFIG`, else defaults).
///     Read one JSON event per line from stdin until EOF:
///         - write the response as one JSON line to stdout
///         - reject lines that are not JSON objects according to the policy
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref()).context("Failed to load config")?;
    init_tracing(&config.telemetry);

    let policy = config.container.on_invalid_event;
    info!(?policy, "Reading events from stdin");

    let stdin = BufReader::new(tokio::io::stdin());
    let stats = serve(stdin, tokio::io::stdout(), policy).await?;

    info!(
        total = stats.total,
        succeeded = stats.succeeded,
        rejected = stats.rejected,
        "Reached end of input"
    );
    Ok(())
}

async fn serve<R, W>(
    mut reader: R,
    mut writer: W,
    policy: InvalidEventPolicy,
) -> Result<InvocationStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    let mut stats = InvocationStats::default();

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .context("Failed to read event")?;
        if read == 0 {
            break;
        }
        if line.trim_ascii().is_empty() {
            continue;
        }

        match invoke_line(&line) {
            Ok(response) => {
                write_line(&mut writer, &response).await?;
                stats.record_success();
            }
            Err(e) => match policy {
                InvalidEventPolicy::Skip => {
                    warn!(error = %e, "Rejected event");
                    write_line(&mut writer, &json!({ "error": e.to_string() })).await?;
                    stats.record_rejection();
                }
                InvalidEventPolicy::Fail => {
                    error!(error = %e, "Rejected event, stopping");
                    writer.flush().await.context("Failed to flush responses")?;
                    return Err(anyhow::Error::new(e).context("Invalid event"));
                }
            },
        }
    }

    writer.flush().await.context("Failed to flush responses")?;
    Ok(stats)
}

/// Lines are raw bytes, so invalid UTF-8 is rejected like any other bad JSON.
fn invoke_line(line: &[u8]) -> Result<Response, PayloadError> {
    let value: Value = serde_json::from_slice(line).map_err(|e| PayloadError::Malformed {
        reason: e.to_string(),
    })?;
    handle_value(&value)
}

async fn write_line<W, T>(writer: &mut W, body: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut buf = serde_json::to_vec(body).map_err(GreeterError::from)?;
    buf.push(b'\n');
    writer
        .write_all(&buf)
        .await
        .context("Failed to write response")?;
    Ok(())
}
