use echo_service::EchoService;
use echo_service::pb::{EchoRequest, EchoResponse};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

/// Echoes the request back, prefixed with the `x-prefix` header when present.
///
/// A message of `"fail"` is answered with an `INVALID_ARGUMENT` status.
pub struct EchoServiceImpl;

#[tonic::async_trait]
impl EchoService for EchoServiceImpl {
    type ServerStreamingEchoStream = ReceiverStream<Result<EchoResponse, Status>>;

    async fn unary_echo(
        &self,
        request: Request<EchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let prefix = request
            .metadata()
            .get("x-prefix")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let req = request.into_inner();
        if req.message == "fail" {
            return Err(Status::invalid_argument("asked to fail"));
        }

        let mut message = req.message.repeat(req.repeat.max(1) as usize);
        if req.shout {
            message = message.to_uppercase();
        }

        Ok(Response::new(EchoResponse {
            message: format!("{prefix}{message}"),
            id: req.id,
            mood: req.mood,
            tags: req.tags,
        }))
    }

    async fn server_streaming_echo(
        &self,
        _req: Request<EchoRequest>,
    ) -> Result<Response<Self::ServerStreamingEchoStream>, Status> {
        unimplemented!("Streaming methods are rejected before reaching the server")
    }
}
