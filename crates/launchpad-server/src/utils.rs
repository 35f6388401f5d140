use actix_web::{
    error::PayloadError,
    web::{Bytes, BytesMut},
};
use futures::{Stream, StreamExt};

/// Drain a request payload into memory.
pub(crate) async fn collect_body<S>(mut stream: S) -> Result<Bytes, PayloadError>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let mut body = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }

    Ok(body.freeze())
}
