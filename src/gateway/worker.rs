use crate::gateway::QuizGateway;
use crate::models::{GatewayRequest, GatewayResponse};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Cloneable sender that stamps each request with a fresh ticket.
#[derive(Debug, Clone)]
pub struct GatewayHandle {
    tx: mpsc::UnboundedSender<GatewayRequest>,
    next_ticket: Arc<AtomicU64>,
}

impl GatewayHandle {
    pub fn new(tx: mpsc::UnboundedSender<GatewayRequest>) -> Self {
        Self {
            tx,
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<GatewayRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Build a request around a new ticket and queue it. The ticket is
    /// returned even if the worker is gone; the response then never arrives
    /// and the caller stays in its pending state.
    pub fn send(&self, build: impl FnOnce(u64) -> GatewayRequest) -> u64 {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        let request = build(ticket);
        debug!(ticket, ?request, "queueing gateway request");
        if self.tx.send(request).is_err() {
            warn!(ticket, "gateway worker is gone, request dropped");
        }
        ticket
    }
}

/// Run every incoming request on its own task so slow calls do not block
/// each other. Exits when all handles are dropped.
pub fn spawn_gateway_worker(
    gateway: Arc<dyn QuizGateway>,
    mut requests: mpsc::UnboundedReceiver<GatewayRequest>,
    responses: mpsc::UnboundedSender<GatewayResponse>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let gateway = Arc::clone(&gateway);
            let responses = responses.clone();
            tokio::spawn(async move {
                let response = dispatch(gateway.as_ref(), request).await;
                let ticket = response.ticket();
                if responses.send(response).is_err() {
                    debug!(ticket, "response receiver closed, dropping response");
                }
            });
        }
        info!("Gateway worker channel closed, exiting");
    })
}

pub async fn dispatch(gateway: &dyn QuizGateway, request: GatewayRequest) -> GatewayResponse {
    match request {
        GatewayRequest::LoadQuestions { ticket } => GatewayResponse::Questions {
            ticket,
            result: gateway.questions().await,
        },
        GatewayRequest::Submit { ticket, payload } => GatewayResponse::Submitted {
            ticket,
            result: gateway.submit(&payload).await,
        },
        GatewayRequest::LoadLeaderboard { ticket, limit } => GatewayResponse::Leaderboard {
            ticket,
            result: gateway.leaderboard(limit).await,
        },
        GatewayRequest::LoadReview { ticket, id } => GatewayResponse::Review {
            ticket,
            result: gateway.review(&id).await,
        },
        GatewayRequest::DeleteEntry { ticket, id } => {
            let result = gateway.delete_entry(&id).await;
            GatewayResponse::EntryDeleted { ticket, id, result }
        }
        GatewayRequest::ClearLeaderboard { ticket } => GatewayResponse::Cleared {
            ticket,
            result: gateway.clear_leaderboard().await,
        },
    }
}
