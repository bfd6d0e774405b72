use futures_util::{SinkExt, StreamExt};
use status_logging::{status_debug, status_info};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{ChannelEvent, EngineEvent, EventSink};

/// Runs one push connection to completion.
///
/// Emits `Opened` once connected, a `Message` per text frame, and exactly one `Closed` at the
/// end. Failures emit `Errored` before `Closed`. Cancelling `close` before the handshake
/// finishes emits nothing.
pub(crate) async fn run_push_channel(url: Url, sink: &dyn EventSink, close: CancellationToken) {
    let emit = |event: ChannelEvent| sink.emit(EngineEvent::Channel(event));

    let connected = tokio::select! {
        _ = close.cancelled() => return,
        result = connect_async(url.as_str()) => result,
    };
    let (stream, _response) = match connected {
        Ok(ok) => ok,
        Err(err) => {
            emit(ChannelEvent::Errored(err.to_string()));
            emit(ChannelEvent::Closed);
            return;
        }
    };
    status_info!("Push channel open: {}", url);
    emit(ChannelEvent::Opened);

    let (mut writer, mut reader) = stream.split();
    loop {
        tokio::select! {
            _ = close.cancelled() => {
                let _ = writer.send(Message::Close(None)).await;
                break;
            }
            frame = reader.next() => match frame {
                Some(Ok(Message::Text(text))) => emit(ChannelEvent::Message(text)),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Ping(payload))) => {
                    status_debug!("Ping from {} ({} bytes)", url, payload.len());
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    emit(ChannelEvent::Errored(err.to_string()));
                    break;
                }
            }
        }
    }

    emit(ChannelEvent::Closed);
}
