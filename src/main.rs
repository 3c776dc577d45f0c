//! Headless demo: runs every challenge in a book against a scripted arena.
//!
//! Usage: `palba-challenges [path/to/challenges.json]`
//! Set `PALBA_PROFILE=1` to turn on puffin scopes, `RUST_LOG` to tune logging.

use glam::Vec2;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palba_challenges::{
    AbilityKind, Arena, Attribute, AttributeStore, Challenge, ChallengeBook, ChallengeContext,
    GameProbe, Objective, RunnerPhase, TracingDriver,
};

const FRAME_DT: f32 = 1.0 / 60.0;
const ARENA_SEED: u64 = 0x9a1b;
const WAVE_SIZE: usize = 6;
const BASE_HIT_DAMAGE: f32 = 15.0;
const ATTACK_INTERVAL: f32 = 0.2;
const INCOMING_HIT_INTERVAL: f32 = 3.0;
const INCOMING_HIT_DAMAGE: f32 = 4.0;
const BASE_MOVE_SPEED: f32 = 1.5;
/// Extra time after a challenge's own timers before the demo gives up on it
const SLACK_SECONDS: f32 = 2.0;

const ABILITY_ROTATION: [AbilityKind; 4] = [
    AbilityKind::Fireball,
    AbilityKind::Sword,
    AbilityKind::Lightning,
    AbilityKind::IceShard,
];

/// Scripted player behaviour for one frame
struct Script {
    attack_timer: f32,
    hit_timer: f32,
    next_ability: usize,
}

impl Script {
    fn new() -> Self {
        Self {
            attack_timer: 0.0,
            hit_timer: 0.0,
            next_ability: 0,
        }
    }

    fn step(&mut self, arena: &mut Arena, ctx: &ChallengeContext, dt: f32) {
        if arena.enemies().len() < WAVE_SIZE {
            arena.spawn_enemies(WAVE_SIZE as u32);
        }

        self.attack_timer += dt;
        while self.attack_timer >= ATTACK_INTERVAL {
            self.attack_timer -= ATTACK_INTERVAL;
            if let Some(&target) = arena.enemies().first() {
                let ability = ABILITY_ROTATION[self.next_ability % ABILITY_ROTATION.len()];
                self.next_ability += 1;
                let damage = BASE_HIT_DAMAGE * ctx.attribute(Attribute::DamageMultiplier);
                arena.hit_enemy(target, ability, damage);
            }
        }

        self.hit_timer += dt;
        if self.hit_timer >= INCOMING_HIT_INTERVAL {
            self.hit_timer -= INCOMING_HIT_INTERVAL;
            let reduction = ctx.attribute(Attribute::DamageReductionBonus) / 100.0;
            arena.hit_player(INCOMING_HIT_DAMAGE * (1.0 - reduction).max(0.0));
        }

        let objective = ctx.runner().current().map(Challenge::objective);
        if objective != Some(Objective::DontMove) {
            let speed = BASE_MOVE_SPEED * ctx.attribute(Attribute::MoveSpeedMultiplier);
            arena.move_player(Vec2::new(speed * dt, 0.0));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palba_challenges=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let profiling = std::env::var_os("PALBA_PROFILE").is_some();
    puffin::set_scopes_on(profiling);

    let book = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "Loading challenge book");
            ChallengeBook::load(&path)?
        }
        None => ChallengeBook::bundled()?,
    };
    info!(challenges = book.challenges.len(), "Challenge book ready");

    let mut arena = Arena::new(ARENA_SEED);
    let mut ctx =
        ChallengeContext::new(AttributeStore::new(), book.engine, Box::new(TracingDriver));
    let mut script = Script::new();

    for definition in &book.challenges {
        if let Err(err) = ctx.trigger(&book, &definition.id) {
            warn!(id = %definition.id, %err, "Could not start challenge");
            continue;
        }

        let budget = book.engine.intro_display_time
            + definition.time_limit
            + book.engine.result_display_time
            + SLACK_SECONDS;
        let mut elapsed = 0.0;
        let mut finished = false;

        while elapsed < budget {
            script.step(&mut arena, &ctx, FRAME_DT);
            ctx.tick(FRAME_DT, &mut arena);
            if arena.take_player_death() {
                ctx.notify_player_died(&mut arena);
            }

            for event in ctx.drain_events() {
                debug!(?event, "Challenge event");
            }

            if profiling {
                puffin::GlobalProfiler::lock().new_frame();
            }

            elapsed += FRAME_DT;
            // Wait for the result banner to clear before moving on
            if ctx.runner().phase() == RunnerPhase::Idle {
                finished = true;
                break;
            }
        }

        if !finished {
            warn!(id = %definition.id, "Challenge did not finish in time, cancelling");
            ctx.cancel_current();
        } else if let Some(done) = ctx.runner().last_completed() {
            info!(
                id = %definition.id,
                challenge = done.display_name(),
                success = done.was_successful(),
                "Challenge result"
            );
        }
        if !ctx.ledger().is_empty() {
            info!("{}", ctx.ledger().describe_active());
        }
    }

    info!(
        kills = arena.total_kills(),
        damage = arena.total_damage_dealt(),
        hp = arena.player_hp().unwrap_or(0.0),
        hp_pct = arena.player_health().map_or(0.0, |h| h.percentage() * 100.0),
        pickups = arena.pickups().len(),
        "Session finished"
    );
    for (attribute, value) in ctx.attributes().snapshot() {
        info!("  {}: {:.2}", attribute.name(), value);
    }
    arena.damage_tracker().log_report();

    ctx.teardown();
    Ok(())
}
