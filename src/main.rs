//! Agentarium demo - a small foraging scenario
//!
//! Wandering agents drift around until they pick up the scent field of a
//! food source, then steer toward it. Drive the simulation from the prompt
//! with tick/run/spawn/status.

use std::io::{self, Write};

use rand::Rng;

use agentarium::agent::Agent;
use agentarium::behaviour::{Behaviour, Composite, Reactive};
use agentarium::core::config::DriverConfig;
use agentarium::core::error::Result;
use agentarium::core::types::Vec2;
use agentarium::driver::SimulationDriver;
use agentarium::influence::{CircularInfluence, InfluenceMap};
use agentarium::object::Object;
use agentarium::world::World;

const FOOD_POSITION: Vec2 = Vec2 { x: 25.0, y: 25.0 };

/// Seek the nearest food object once its scent is strong enough, otherwise
/// wander with a random walk.
fn forager() -> Box<dyn Behaviour> {
    let seek = Reactive::new(|state, ctx, _dt| {
        if let Some(food) = ctx.nearest_tagged(state.object.position, "food") {
            let dir = food.position - state.object.position;
            state.object.set_heading(dir.y.atan2(dir.x).to_degrees());
            state.object.set_velocity(4.0);
        }
        Ok(())
    })
    .with_guard(|state, ctx| ctx.influence("scent", state.object.position) > 0.4);

    let wander = Reactive::new(|state, ctx, _dt| {
        let turn: f32 = ctx.rng().gen_range(-30.0..30.0);
        state.object.rotate(turn);
        state.object.set_velocity(2.0);
        Ok(())
    });

    Box::new(Composite::new().then(Box::new(seek)).then(Box::new(wander)))
}

fn build_world() -> Result<World> {
    let mut world = World::with_seed(42);

    let mut scent = InfluenceMap::new();
    scent.add(CircularInfluence::fixed(FOOD_POSITION, 1.0, 80.0));
    world.add_influence_layer("scent", scent);

    world.add_object(Object::new(FOOD_POSITION.x, FOOD_POSITION.y, 0.0).with_tag("food"))?;

    for i in 0..5 {
        let x = -40.0 + 20.0 * i as f32;
        world.add_agent(Agent::new(
            Object::new(x, -40.0, 90.0).with_tag("forager"),
            forager(),
        ))?;
    }

    Ok(world)
}

fn display_status(driver: &SimulationDriver) {
    let Some(world) = driver.world() else {
        println!("(no world - driver stopped)");
        return;
    };
    println!(
        "tick {} | elapsed {:.2}s | {} entities | driver {:?}",
        world.tick(),
        world.elapsed(),
        world.len(),
        driver.state()
    );
    for view in world.snapshot() {
        let kind = if view.is_agent { "agent" } else { "object" };
        println!(
            "  {:?} {} [{}] at ({:.1}, {:.1}) heading {:.0}",
            view.id,
            kind,
            view.tag.as_deref().unwrap_or("-"),
            view.position.x,
            view.position.y,
            view.heading
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("agentarium=info")
        .init();

    tracing::info!("agentarium demo starting");

    let world = build_world()?;
    let config = DriverConfig::new(20.0);
    let mut driver = SimulationDriver::new(config, world)?;

    println!("\n=== AGENTARIUM ===");
    println!("Foraging demo: agents wander until they smell food, then home in.");
    println!();
    println!("Commands:");
    println!("  tick / t     - Advance the simulation by one tick");
    println!("  run <n>      - Run n ticks");
    println!("  spawn        - Add another forager");
    println!("  status / s   - Show world state");
    println!("  quit / q     - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            match driver.step() {
                Ok(()) => println!("tick {} complete", driver.ticks_run()),
                Err(e) => println!("tick failed: {e}"),
            }
            continue;
        }

        if input == "status" || input == "s" {
            display_status(&driver);
            continue;
        }

        if let Some(rest) = input.strip_prefix("run ") {
            match rest.parse::<u32>() {
                Ok(n) => {
                    for _ in 0..n {
                        if let Err(e) = driver.step() {
                            println!("tick failed: {e}");
                            break;
                        }
                    }
                    println!("now at tick {}", driver.ticks_run());
                }
                Err(_) => println!("usage: run <number>"),
            }
            continue;
        }

        if input == "spawn" {
            if let Some(world) = driver.world_mut() {
                let id = world.add_agent(Agent::new(
                    Object::new(0.0, -40.0, 90.0).with_tag("forager"),
                    forager(),
                ))?;
                println!("spawned forager {id:?}");
            } else {
                println!("no world - driver stopped");
            }
            continue;
        }

        println!("unknown command: {input}");
    }

    Ok(())
}
