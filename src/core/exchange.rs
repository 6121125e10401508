use crate::core::pairing::PairingEngine;
use crate::core::rules::{count_valid_permutations, validate_roster, PermutationCount};
use crate::core::Notifier;
use crate::domain::model::{Message, Pair, Roster};
use crate::render::MessageRenderer;
use crate::utils::error::Result;
use rand::Rng;

/// A complete pairing plus the informational search-space size.
#[derive(Debug, Clone)]
pub struct ExchangePlan {
    pub permutations: PermutationCount,
    pub pairs: Vec<Pair>,
}

/// Validate the roster, size it, then match.
///
/// Roster errors abort before the first shuffle.
pub fn plan_exchange<R: Rng>(
    roster: &Roster,
    engine: &mut PairingEngine<R>,
) -> Result<ExchangePlan> {
    validate_roster(roster)?;

    let permutations = count_valid_permutations(roster);
    tracing::info!("🎲 There are {} pair permutations", permutations);
    if permutations.is_zero() {
        tracing::warn!("⚠️ Someone in the roster has no eligible gifter");
    }

    let pairs = engine.create_pairs(roster)?;
    tracing::info!("✅ Matched {} participants", pairs.len());

    Ok(ExchangePlan {
        permutations,
        pairs,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelivery {
    pub recipient: String,
    pub gifter: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Renders and delivers one message per pair.
pub struct GiftExchange<N: Notifier> {
    notifier: N,
    renderer: MessageRenderer,
}

impl<N: Notifier> GiftExchange<N> {
    pub fn new(notifier: N, renderer: MessageRenderer) -> Self {
        Self { notifier, renderer }
    }

    pub fn renderer(&self) -> &MessageRenderer {
        &self.renderer
    }

    /// Every message is rendered before the first delivery, so a template
    /// error sends nothing. Delivery failures are recorded and skipped.
    pub async fn notify_all(&self, pairs: &[Pair]) -> Result<DeliveryReport> {
        let messages = pairs
            .iter()
            .map(|pair| self.renderer.render(pair))
            .collect::<Result<Vec<Message>>>()?;

        let mut report = DeliveryReport::default();
        for (pair, message) in pairs.iter().zip(&messages) {
            let recipient = pair.gifter.email.as_str();
            let gifter = pair.gifter.full_name();
            tracing::info!("📧 Sending message to {}", gifter);

            match self.notifier.deliver(recipient, message).await {
                Ok(()) => report.delivered.push(recipient.to_string()),
                Err(e) => {
                    tracing::error!("❌ {}", e);
                    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                    report.failed.push(FailedDelivery {
                        recipient: recipient.to_string(),
                        gifter,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Delivered {}/{} messages",
            report.delivered.len(),
            pairs.len()
        );
        Ok(report)
    }

    /// Sends the message for `pair` to `recipient` instead of the gifter.
    pub async fn notify_sample(&self, pair: &Pair, recipient: &str) -> Result<()> {
        let message = self.renderer.render(pair)?;
        tracing::info!("📧 Sending sample message to {}", recipient);
        self.notifier.deliver(recipient, &message).await
    }
}
