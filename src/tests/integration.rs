//! Integration tests for the sandbox
//!
//! These drive a whole [`Session`](crate::session::Session) the way a host
//! would: add sprites, build scripts, play them concurrently and read the
//! sprite state back. Time is paused so every duration is exact.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::SandboxConfig;
    use crate::core::block::BlockInstance;
    use crate::core::sprite::{Position, SpriteKind};
    use crate::session::Session;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn total_blocks(session: &Session) -> usize {
        session
            .sprites()
            .iter()
            .map(|s| session.script(s.id).len())
            .sum()
    }

    /// Streams of different sprites run side by side; the run lasts as long
    /// as the slowest stream
    #[tokio::test(start_paused = true)]
    async fn test_play_all_runs_streams_concurrently() {
        init_logging();
        let mut session = Session::new();
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        let dog = session.add_sprite(SpriteKind::Dog).unwrap();
        session.update_sprite_blocks(
            cat,
            vec![BlockInstance::move_by(10), BlockInstance::move_by(10)],
        );
        session.update_sprite_blocks(dog, vec![BlockInstance::say("woof", 1)]);

        let report = session.play_all().await;

        assert_eq!(report.duration, Duration::from_millis(1000));
        assert_eq!(report.executed_by(cat), Some(2));
        assert_eq!(report.executed_by(dog), Some(1));
        assert_eq!(report.swaps, 0);
        assert_eq!(session.sprite(cat).unwrap().position, Position::new(70, 50));

        let dog_state = session.sprite(dog).unwrap();
        assert_eq!(dog_state.speech.text, "woof");
        assert!(!dog_state.speech.visible);
    }

    /// `repeat(3) { move(10) }` moves +30 in three move pauses
    #[tokio::test(start_paused = true)]
    async fn test_repeat_timing() {
        let mut session = Session::new();
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        session.update_sprite_blocks(
            cat,
            vec![BlockInstance::repeat(3, vec![BlockInstance::move_by(10)])],
        );

        let report = session.play_all().await;

        assert_eq!(report.duration, Duration::from_millis(1500));
        assert_eq!(session.sprite(cat).unwrap().position, Position::new(80, 50));
    }

    /// An empty session completes immediately
    #[tokio::test(start_paused = true)]
    async fn test_empty_session() {
        let session = Session::new();
        let report = session.play_all().await;
        assert!(report.streams.is_empty());
        assert_eq!(report.duration, Duration::ZERO);
    }

    /// The move pause comes from configuration
    #[tokio::test(start_paused = true)]
    async fn test_configured_move_pause() {
        let config = SandboxConfig::from_json_str(r#"{ "move_pause_ms": 200 }"#).unwrap();
        let mut session = Session::with_config(config);
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        session.update_sprite_blocks(
            cat,
            vec![BlockInstance::move_by(1), BlockInstance::move_by(1)],
        );

        let report = session.play_all().await;
        assert_eq!(report.duration, Duration::from_millis(400));
    }

    /// Hosts can watch bubbles through the stage while a run is in flight
    #[tokio::test(start_paused = true)]
    async fn test_bubble_visible_during_run() {
        let mut session = Session::new();
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        session.update_sprite_blocks(cat, vec![BlockInstance::think("Hmm...", 2)]);

        let run = session.start_run();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let mid = session.sprite(cat).unwrap();
        assert!(mid.thought.visible);
        assert_eq!(mid.thought.text, "Hmm...");
        assert!(!run.is_finished());

        run.join().await;
        assert!(!session.sprite(cat).unwrap().thought.visible);
    }

    /// Scripts arrive from the host as JSON with user-typed strings
    #[tokio::test(start_paused = true)]
    async fn test_host_json_script() {
        let mut session = Session::new();
        let robot = session.add_sprite_named("robot").unwrap();
        let script: Vec<BlockInstance> = serde_json::from_str(
            r#"[
                { "kind": "goTo", "params": ["10", "20"] },
                { "kind": "dance" },
                { "kind": "repeat", "params": ["2"], "children": [
                    { "kind": "turn", "params": ["200"] }
                ]},
                { "kind": "turnLeft", "params": ["not a number"] },
                { "kind": "move", "params": ["5px"] }
            ]"#,
        )
        .unwrap();
        session.update_sprite_blocks(robot, script);

        let report = session.play_all().await;

        let sprite = session.sprite(robot).unwrap();
        assert_eq!(sprite.position, Position::new(15, 20));
        assert_eq!(sprite.rotation(), 40);
        assert_eq!(report.executed_by(robot), Some(5));
        assert_eq!(report.duration, Duration::from_millis(500));
    }

    fn cat_meets_dog() -> Vec<BlockInstance> {
        vec![BlockInstance::go_to(100, 100), BlockInstance::turn(45)]
    }

    fn dog_waits() -> Vec<BlockInstance> {
        vec![BlockInstance::say("hi", 5), BlockInstance::move_by(3)]
    }

    /// Without hero mode overlapping sprites keep their own scripts
    #[tokio::test(start_paused = true)]
    async fn test_no_swap_without_hero_mode() {
        let mut session = Session::new();
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        let dog = session.add_sprite(SpriteKind::Dog).unwrap();
        session.update_sprite_blocks(cat, cat_meets_dog());
        session.update_sprite_blocks(dog, dog_waits());

        let report = session.play_all().await;

        assert_eq!(report.swaps, 0);
        let cat_state = session.sprite(cat).unwrap();
        let dog_state = session.sprite(dog).unwrap();
        assert_eq!(cat_state.rotation(), 45);
        assert_eq!(cat_state.position, Position::new(100, 100));
        assert_eq!(dog_state.speech.text, "hi");
        assert_eq!(dog_state.position, Position::new(103, 100));
    }

    /// With hero mode, sprites that meet mid-run trade their remaining blocks;
    /// every block still runs exactly once
    #[tokio::test(start_paused = true)]
    async fn test_hero_mode_swaps_remaining_blocks() {
        init_logging();
        let mut session = Session::new();
        session.set_hero_mode(true);
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        let dog = session.add_sprite(SpriteKind::Dog).unwrap();
        session.update_sprite_blocks(cat, cat_meets_dog());
        session.update_sprite_blocks(dog, dog_waits());

        let report = session.play_all().await;

        assert_eq!(report.swaps, 1);
        assert_eq!(report.total_executed(), 4);
        assert!(report.duration >= Duration::from_millis(5000));
        assert!(report.duration <= Duration::from_millis(5500));

        let sprites = session.sprites();
        assert_eq!(sprites.iter().filter(|s| s.speech.text == "hi").count(), 1);
        assert_eq!(sprites.iter().filter(|s| s.rotation() == 45).count(), 1);
        assert_eq!(sprites.iter().filter(|s| s.position.x == 103).count(), 1);
        // Stored scripts are untouched by run-time swaps.
        assert_eq!(session.script(cat)[1], BlockInstance::turn(45));
        assert_eq!(session.script(dog)[1], BlockInstance::move_by(3));
    }

    /// Three sprites stacked on one point: at most one swap per finished
    /// block, and no block is lost or duplicated
    #[tokio::test(start_paused = true)]
    async fn test_multi_way_overlap_conserves_blocks() {
        let mut session = Session::new();
        session.set_hero_mode(true);
        let ids: Vec<_> = SpriteKind::ALL
            .into_iter()
            .map(|kind| session.add_sprite(kind).unwrap())
            .collect();
        for (n, id) in ids.iter().enumerate() {
            session.update_sprite_position(*id, 100, 100);
            let n = n as i64 + 1;
            session.update_sprite_blocks(
                *id,
                vec![
                    BlockInstance::turn(n),
                    BlockInstance::move_by(0),
                    BlockInstance::turn(n * 10),
                    BlockInstance::say("step", 1),
                ],
            );
        }
        let expected = total_blocks(&session);

        let report = session.play_all().await;

        assert_eq!(report.total_executed(), expected);
        assert!(report.swaps >= 1);
        let rotation_sum: i64 = session.sprites().iter().map(|s| s.rotation()).sum();
        assert_eq!(rotation_sum, 1 + 2 + 3 + 10 + 20 + 30);
    }

    /// Two sprites finishing a block in the same tick swap once; the one that
    /// got the other's blocks does not take them back before its partner has
    /// completed a block
    #[tokio::test(start_paused = true)]
    async fn test_same_tick_pair_swaps_once() {
        init_logging();
        let mut session = Session::new();
        session.set_hero_mode(true);
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        let dog = session.add_sprite(SpriteKind::Dog).unwrap();
        session.update_sprite_position(cat, 100, 100);
        session.update_sprite_position(dog, 100, 100);
        session.update_sprite_blocks(cat, vec![BlockInstance::move_by(0), BlockInstance::turn(1)]);
        session.update_sprite_blocks(dog, vec![BlockInstance::move_by(0), BlockInstance::turn(2)]);

        let report = session.play_all().await;

        assert_eq!(report.swaps, 1);
        assert_eq!(report.executed_by(cat), Some(2));
        assert_eq!(report.executed_by(dog), Some(2));
        // Each sprite ran the other's turn.
        assert_eq!(session.sprite(cat).unwrap().rotation(), 2);
        assert_eq!(session.sprite(dog).unwrap().rotation(), 1);
        assert_eq!(report.duration, Duration::from_millis(500));
    }

    /// Three stacked sprites finishing one after another: the first to finish
    /// takes the dog's tail, completes it, then takes the robot's tail
    #[tokio::test(start_paused = true)]
    async fn test_staggered_three_way_swaps() {
        let mut session = Session::new();
        session.set_hero_mode(true);
        let ids: Vec<_> = SpriteKind::ALL
            .into_iter()
            .map(|kind| session.add_sprite(kind).unwrap())
            .collect();
        for (n, id) in ids.iter().enumerate() {
            let n = n as i64 + 1;
            session.update_sprite_position(*id, 100, 100);
            session.update_sprite_blocks(
                *id,
                vec![BlockInstance::think("...", n), BlockInstance::turn(n)],
            );
        }
        let (cat, dog, robot) = (ids[0], ids[1], ids[2]);

        let report = session.play_all().await;

        assert_eq!(report.swaps, 2);
        assert_eq!(report.executed_by(cat), Some(3));
        assert_eq!(report.executed_by(dog), Some(2));
        assert_eq!(report.executed_by(robot), Some(1));
        assert_eq!(session.sprite(cat).unwrap().rotation(), 2 + 3);
        assert_eq!(session.sprite(dog).unwrap().rotation(), 1);
        assert_eq!(session.sprite(robot).unwrap().rotation(), 0);
        assert_eq!(report.duration, Duration::from_millis(3000));
    }

    /// Reset-All during a run only clears stored scripts
    #[tokio::test(start_paused = true)]
    async fn test_reset_all_does_not_interrupt_run() {
        let mut session = Session::new();
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        session.update_sprite_blocks(cat, vec![BlockInstance::move_by(5); 4]);

        let run = session.start_run();
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.reset_all();
        let report = run.join().await;

        assert_eq!(report.executed_by(cat), Some(4));
        assert_eq!(session.sprite(cat).unwrap().position.x, 70);
        assert!(session.script(cat).is_empty());
    }

    /// Removing a sprite mid-run turns its remaining effects into no-ops
    #[tokio::test(start_paused = true)]
    async fn test_remove_sprite_mid_run() {
        let mut session = Session::new();
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        let dog = session.add_sprite(SpriteKind::Dog).unwrap();
        session.update_sprite_blocks(cat, vec![BlockInstance::move_by(5); 3]);
        session.update_sprite_blocks(dog, vec![BlockInstance::move_by(1)]);

        let run = session.start_run();
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.remove_sprite(cat);
        let report = run.join().await;

        assert_eq!(report.executed_by(cat), Some(3));
        assert!(session.sprite(cat).is_none());
        assert_eq!(session.sprite(dog).unwrap().position.x, 101);
    }

    /// Drag release: within the radius swaps whole scripts, at the radius not
    #[test]
    fn test_drag_release_swap_threshold() {
        let mut session = Session::new();
        session.set_hero_mode(true);
        let cat = session.add_sprite(SpriteKind::Cat).unwrap();
        let dog = session.add_sprite(SpriteKind::Dog).unwrap();
        let cat_script = vec![BlockInstance::move_by(1), BlockInstance::turn(5)];
        let dog_script = vec![BlockInstance::say("hello", 1)];
        session.update_sprite_blocks(cat, cat_script.clone());
        session.update_sprite_blocks(dog, dog_script.clone());

        // Dog sits at (100, 100); exactly 20 units away is not a collision.
        session.update_sprite_position(cat, 80, 100);
        assert_eq!(session.release_drag(cat), None);
        assert_eq!(session.script(cat), cat_script.as_slice());

        session.update_sprite_position(cat, 81, 100);
        assert_eq!(session.release_drag(cat), Some(dog));
        assert_eq!(session.script(cat), dog_script.as_slice());
        assert_eq!(session.script(dog), cat_script.as_slice());
    }
}
