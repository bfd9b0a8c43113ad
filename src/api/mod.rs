//! Request/response surface over the session store.
//!
//! `Service` exposes one typed method per operation. `Service::dispatch`
//! accepts an operation name and a JSON payload for transports that only
//! speak strings.

pub mod request;
pub mod response;
pub mod service;

pub use request::{
    AddPlayerRequest, ApplyPenaltyRequest, ChangeGameStateRequest, DeleteAllSessionsRequest,
    InitSessionRequest, RemovePlayerRequest, Request, ResetGameRequest, SessionRef,
    SubmitSetRequest,
};
pub use response::{
    ConfigBody, GridBody, HintsBody, PlayersBody, Reply, Response, Status, SubmitBody,
};
pub use service::Service;
