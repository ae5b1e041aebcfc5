//! Tool Arena - runs a tournament of Outpost games between LLM agents and
//! the random baseline

use std::sync::Arc;
use tool_arena::config::{ArenaConfig, RANDOM_AGENT};
use tool_arena::llm::{LlmConfig, ModelRegistry};
use tool_arena::negotiation::Negotiator;
use tool_arena::outpost::{OutpostConfig, OutpostGame, OutpostMove, COLORS};
use tool_arena::player::{LlmPlayer, Player, RandomPlayer};
use tool_arena::runner::{run_tournament, GameSetup, RunnerError, Seats};
use tool_arena::system_prompt::GameBrief;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_seats(
    registry: &ModelRegistry,
    arena: &ArenaConfig,
    agents: &[String],
    game: usize,
) -> Result<Seats<OutpostMove>, RunnerError> {
    let brief = GameBrief {
        game_name: "Outpost".to_string(),
        target_points: arena.target_points,
        ..Default::default()
    };

    agents
        .iter()
        .zip(COLORS)
        .enumerate()
        .map(|(seat, (agent, color))| -> Result<Box<dyn Player<OutpostMove>>, RunnerError> {
            if agent == RANDOM_AGENT {
                return Ok(Box::new(RandomPlayer::new(color, arena.seat_seed(game, seat))));
            }
            let model = registry
                .resolve(agent)
                .ok_or_else(|| RunnerError::Setup(format!("model {agent} is not available")))?;
            let negotiator = Negotiator::new(model.service, model.pricing, arena.negotiation(game, seat));
            Ok(Box::new(LlmPlayer::new(color, negotiator, brief.clone())))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tool_arena=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let arena = ArenaConfig::from_env();
    let llm_config = LlmConfig::from_env();
    let registry = Arc::new(ModelRegistry::new(&llm_config));

    if registry.has_models() {
        tracing::info!(
            models = ?registry.available_models(),
            default = %registry.default_model_id(),
            "LLM registry initialized"
        );
    } else {
        tracing::warn!("No LLM API key configured. Set OPENROUTER_API_KEY to seat LLM agents.");
    }

    let agents = if !arena.players.is_empty() {
        arena.players.clone()
    } else if registry.has_models() {
        vec![registry.default_model_id().to_string(), RANDOM_AGENT.to_string()]
    } else {
        vec![RANDOM_AGENT.to_string(), RANDOM_AGENT.to_string()]
    };
    if !(2..=COLORS.len()).contains(&agents.len()) {
        return Err(format!("ARENA_PLAYERS needs 2 to {} seats, got {}", COLORS.len(), agents.len()).into());
    }
    tracing::info!(games = arena.games, agents = ?agents, seed = ?arena.seed, "Starting tournament");

    let summary = run_tournament(arena.games, |game| {
        let engine = OutpostGame::new(&OutpostConfig {
            colors: COLORS.iter().take(agents.len()).map(ToString::to_string).collect(),
            target_points: arena.target_points,
            seed: arena.game_seed(game),
            ..Default::default()
        })?;
        Ok(GameSetup {
            engine,
            players: build_seats(&registry, &arena, &agents, game)?,
            config: arena.runner(),
        })
    })
    .await;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if summary.records.is_empty() && !summary.failures.is_empty() {
        return Err("every game failed".into());
    }
    Ok(())
}
