use embedded_hal_mock::eh1::delay::NoopDelay;
use lbot_core::utils::{
    config::{RobotConfig, WaitPolicy},
    controllers::{Joint, Maneuver, RemoteCommand, RobotController, WaitOutcome},
    hal::{Hal, HalEvent, SimulatedHal},
};

/// Default port of the left line sensor.
const SENSOR_LEFT: u8 = 0;
/// Default port of the right line sensor.
const SENSOR_RIGHT: u8 = 1;
const DISTANCE_SENSOR: u8 = 2;
const MOTOR_LEFT: u8 = 0;
const MOTOR_RIGHT: u8 = 1;
const SERVO_EXTENDER: u8 = 0;
const SERVO_ARM: u8 = 1;
const SERVO_CLAW: u8 = 2;

type Robot = RobotController<SimulatedHal<NoopDelay>>;

fn new_robot() -> Robot {
    robot_with(RobotConfig::default(), 0)
}

/// Controller over a simulator whose encoders move `encoder_rate` counts per
/// full-speed command.
fn robot_with(
    config: RobotConfig,
    encoder_rate: i32,
) -> Robot {
    let hal = SimulatedHal::new(NoopDelay::new()).with_encoder_rate(encoder_rate);
    RobotController::new(hal, config)
}

fn pairs(robot: &Robot) -> Vec<(i32, i32)> {
    robot.hal().motor_pairs(MOTOR_LEFT, MOTOR_RIGHT)
}

fn script_line(
    robot: &mut Robot,
    left: &[i32],
    right: &[i32],
) {
    robot.hal_mut().script_analog(SENSOR_LEFT, left.iter().copied());
    robot.hal_mut().script_analog(SENSOR_RIGHT, right.iter().copied());
}

#[test]
fn drive_primitives_reach_both_motors() {
    let mut robot = new_robot();
    robot.forward(70);
    robot.turn_right(70);
    robot.turn_left(70);
    robot.turn_right(-5);
    assert_eq!(pairs(&robot), vec![(70, 70), (35, -70), (-70, 35), (-3, 5)]);
}

#[test]
fn velocity_mode_uses_mav_commands() {
    let mut robot = new_robot();
    robot.drive_velocity(lbot_core::utils::MotorCommand::new(40, 140));
    assert_eq!(
        robot.hal().events(),
        &[
            HalEvent::MotorVelocity {
                port: MOTOR_LEFT,
                velocity: 40
            },
            HalEvent::MotorVelocity {
                port: MOTOR_RIGHT,
                velocity: 100
            },
        ]
    );
}

#[test]
fn negative_degrees_turn_right_then_stop() {
    let mut robot = new_robot();
    robot.turn_deg(-90.0);
    assert_eq!(
        robot.hal().events(),
        &[
            HalEvent::Motor {
                port: MOTOR_LEFT,
                speed: 50
            },
            HalEvent::Motor {
                port: MOTOR_RIGHT,
                speed: -100
            },
            HalEvent::Sleep { ms: 1137 },
            HalEvent::AllOff,
        ]
    );
}

#[test]
fn turn_around_is_a_timed_left_half_turn() {
    let mut robot = new_robot();
    robot.turn_around();
    assert_eq!(pairs(&robot), vec![(-100, 50)]);
    assert_eq!(robot.hal().slept_ms(), 2275);
    assert_eq!(robot.hal().events().last(), Some(&HalEvent::AllOff));
}

#[test]
fn one_meter_runs_until_both_encoders_cross() {
    let mut robot = robot_with(RobotConfig::default(), 100);
    let outcome = robot.move_for_m(1.0, 100, |r, s| r.forward(s));

    assert_eq!(outcome, WaitOutcome::Reached);
    let events = robot.hal().events();
    assert_eq!(events[0], HalEvent::ClearPosition { port: MOTOR_LEFT });
    assert_eq!(events[1], HalEvent::ClearPosition { port: MOTOR_RIGHT });
    assert_eq!(events.last(), Some(&HalEvent::AllOff));
    // -100 counts per tick against a -8550 target
    assert_eq!(pairs(&robot).len(), 86);
}

#[test]
fn encoder_counters_are_reset_before_moving() {
    let mut robot = robot_with(RobotConfig::default(), 100);
    robot.hal_mut().place_encoder(MOTOR_LEFT, -20_000);
    robot.hal_mut().place_encoder(MOTOR_RIGHT, -20_000);
    robot.move_for_m(0.5, 100, |r, s| r.forward(s));
    assert_eq!(pairs(&robot).len(), 43);
}

#[test]
fn positive_centimeters_target_the_opposite_sign() {
    let mut robot = robot_with(RobotConfig::default(), 100);
    let outcome = robot.move_for_cm(100.0, 100, |r, s| r.forward(s));
    assert_eq!(outcome, WaitOutcome::Reached);
    assert!(pairs(&robot).is_empty());

    let mut robot = robot_with(RobotConfig::default(), 100);
    robot.move_for_cm(-50.0, 100, |r, s| r.forward(s));
    assert_eq!(pairs(&robot).len(), 43);
}

#[test]
fn stalled_move_gives_up_when_bounded() {
    let mut config = RobotConfig::default();
    config.limits.distance = WaitPolicy::MaxIterations(10);
    let mut robot = robot_with(config, 0);

    let outcome = robot.move_for_m(1.0, 80, |r, s| r.forward(s));

    assert_eq!(outcome, WaitOutcome::Exhausted { iterations: 10 });
    assert_eq!(pairs(&robot).len(), 10);
    assert_eq!(robot.hal().events().last(), Some(&HalEvent::AllOff));
}

#[test]
fn distance_sensor_move_stops_at_threshold() {
    let mut robot = new_robot();
    robot
        .hal_mut()
        .script_analog(DISTANCE_SENSOR, [100, 500, 1000, 2000]);

    let outcome = robot.move_until_distance_sensor(1500, 60, RobotController::forward);

    assert!(outcome.reached());
    assert_eq!(pairs(&robot), vec![(60, 60); 3]);
    assert_eq!(robot.hal().events().last(), Some(&HalEvent::AllOff));
}

#[test]
fn distance_sensor_move_bounded() {
    let mut config = RobotConfig::default();
    config.limits.sensor = WaitPolicy::MaxIterations(4);
    let mut robot = robot_with(config, 0);
    robot.hal_mut().script_analog(DISTANCE_SENSOR, [0]);

    let outcome = robot.move_until_distance_sensor(1500, 60, |r, s| r.turn_left(s));
    assert_eq!(outcome, WaitOutcome::Exhausted { iterations: 4 });
    assert_eq!(pairs(&robot), vec![(-60, 30); 4]);
}

#[test]
fn bang_bang_truth_table() {
    let cases = [
        ((1000, 1000), (80, 80)),
        ((1000, 3000), (40, -80)),
        ((3000, 1000), (-80, 40)),
        ((3000, 3000), (80, 80)),
        ((2699, 2700), (40, -80)),
    ];
    for ((left, right), expected) in cases {
        let mut robot = new_robot();
        script_line(&mut robot, &[left], &[right]);
        robot.follow_line(80);
        assert_eq!(pairs(&robot), vec![expected], "readings {left}/{right}");
    }
}

#[test]
fn intersection_needs_both_sensors_at_once() {
    let mut robot = new_robot();
    script_line(
        &mut robot,
        &[3000, 1000, 3000, 3000],
        &[1000, 3000, 1000, 2800],
    );

    let outcome = robot.follow_line_until_intersection(100);

    assert_eq!(outcome, WaitOutcome::Reached);
    assert_eq!(pairs(&robot), vec![(-100, 50), (50, -100), (-100, 50)]);
    let events = robot.hal().events();
    assert_eq!(
        &events[events.len() - 2..],
        &[HalEvent::AllOff, HalEvent::Sleep { ms: 10_000 }]
    );
    assert_eq!(robot.hal().slept_ms(), 3 * 20 + 10_000);
}

#[test]
fn intersection_on_first_tick_skips_following() {
    let mut robot = new_robot();
    script_line(&mut robot, &[2700], &[2700]);
    robot.follow_line_until_intersection(100);
    assert!(pairs(&robot).is_empty());
    assert_eq!(
        robot.hal().events(),
        &[HalEvent::AllOff, HalEvent::Sleep { ms: 10_000 }]
    );
}

#[test]
fn lost_line_is_bounded_without_dwell() {
    let mut config = RobotConfig::default();
    config.limits.intersection = WaitPolicy::MaxIterations(5);
    let mut robot = robot_with(config, 0);
    script_line(&mut robot, &[500], &[500]);

    let outcome = robot.follow_line_until_intersection(90);

    assert_eq!(outcome, WaitOutcome::Exhausted { iterations: 5 });
    assert_eq!(pairs(&robot), vec![(90, 90); 5]);
    assert_eq!(robot.hal().slept_ms(), 5 * 20);
    assert_eq!(robot.hal().events().last(), Some(&HalEvent::AllOff));
}

#[test]
fn proportional_tick_clamps_each_side() {
    let mut robot = new_robot();
    script_line(&mut robot, &[3000], &[2000]);
    robot.follow_line_proportional(100);
    assert_eq!(pairs(&robot), vec![(0, 100)]);

    let mut robot = new_robot();
    script_line(&mut robot, &[2000], &[2000]);
    robot.follow_line_proportional(55);
    assert_eq!(pairs(&robot), vec![(55, 55)]);
}

#[test]
fn gradual_servo_skips_goal() {
    let mut robot = new_robot();
    robot.hal_mut().place_servo(SERVO_ARM, 900);
    robot.set_servo_position_gradual(SERVO_ARM, 905);
    assert_eq!(robot.hal().servo_trace(SERVO_ARM), vec![901, 902, 903, 904]);
    assert_eq!(robot.hal().slept_ms(), 4);

    let mut robot = new_robot();
    robot.hal_mut().place_servo(SERVO_ARM, 905);
    robot.set_servo_position_gradual(SERVO_ARM, 900);
    assert_eq!(robot.hal().servo_trace(SERVO_ARM), vec![904, 903, 902, 901]);
}

#[test]
fn servo_at_goal_issues_nothing() {
    let mut robot = new_robot();
    robot.hal_mut().place_servo(SERVO_CLAW, 1000);
    robot.open_claw();
    assert!(robot.hal().events().is_empty());
}

#[test]
fn named_joint_moves_use_presets() {
    let mut robot = new_robot();
    robot.hal_mut().place_servo(SERVO_ARM, 926);
    robot.lower_arm();
    assert_eq!(robot.hal().servo_trace(SERVO_ARM), vec![925, 924]);

    let mut robot = new_robot();
    robot.hal_mut().place_servo(SERVO_CLAW, 2044);
    robot.close_claw();
    assert_eq!(robot.hal().servo_trace(SERVO_CLAW), vec![2045, 2046]);

    let mut robot = new_robot();
    robot.hal_mut().place_servo(SERVO_EXTENDER, 1797);
    robot.extender_down();
    assert_eq!(robot.hal().servo_trace(SERVO_EXTENDER), vec![1798, 1799]);
}

#[test]
fn start_servos_enables_then_poses_in_order() {
    let mut robot = new_robot();
    robot.hal_mut().place_servo(SERVO_EXTENDER, 846);
    robot.hal_mut().place_servo(SERVO_ARM, 1796);
    robot.hal_mut().place_servo(SERVO_CLAW, 1003);

    robot.start_servos();

    assert!(robot.hal().servos_enabled());
    let servo_events: Vec<HalEvent> = robot
        .hal()
        .events()
        .iter()
        .copied()
        .filter(|e| !matches!(e, HalEvent::Sleep { .. }))
        .collect();
    let servo = |port, position| HalEvent::Servo { port, position };
    assert_eq!(
        servo_events,
        vec![
            HalEvent::EnableServos,
            servo(SERVO_EXTENDER, 847),
            servo(SERVO_EXTENDER, 848),
            servo(SERVO_EXTENDER, 849),
            servo(SERVO_ARM, 1797),
            servo(SERVO_ARM, 1798),
            servo(SERVO_ARM, 1799),
            servo(SERVO_CLAW, 1002),
            servo(SERVO_CLAW, 1001),
        ]
    );
}

#[test]
fn remote_commands_drive_the_controller() {
    let mut robot = robot_with(RobotConfig::default(), 100);
    script_line(&mut robot, &[1000], &[1000]);

    let cmd = RemoteCommand::parse(r#"{"rc":"move_cm","cm":-50.0,"s":100,"via":"follow_line"}"#)
        .unwrap();
    assert!(robot.execute(cmd).reached());
    assert_eq!(pairs(&robot).len(), 43);

    robot.hal_mut().take_events();
    robot.execute(RemoteCommand::Stop);
    assert_eq!(robot.hal().events(), &[HalEvent::AllOff]);

    robot.hal_mut().take_events();
    robot.hal_mut().place_servo(SERVO_CLAW, 1003);
    robot.execute(RemoteCommand::Joint {
        j: Joint::Claw,
        raised: true,
    });
    assert_eq!(robot.hal().servo_trace(SERVO_CLAW), vec![1002, 1001]);
}

#[test]
fn remote_bounded_move_reports_exhaustion() {
    let mut config = RobotConfig::default();
    config.limits.distance = WaitPolicy::MaxIterations(3);
    let mut robot = robot_with(config, 0);

    let outcome = robot.execute(RemoteCommand::MoveM {
        meters: 2.0,
        s: 50,
        via: Maneuver::TurnRight,
    });
    assert_eq!(outcome, WaitOutcome::Exhausted { iterations: 3 });
    assert_eq!(pairs(&robot), vec![(25, -50); 3]);
}

#[test]
fn remote_extreme_speeds_are_clamped() {
    let mut robot = new_robot();
    let cmd = RemoteCommand::parse(r#"{"rc":"turn_right","s":-2147483648}"#).unwrap();
    robot.execute(cmd);
    let cmd = RemoteCommand::parse(r#"{"rc":"turn_left","s":2147483647}"#).unwrap();
    robot.execute(cmd);
    assert_eq!(pairs(&robot), vec![(-50, 100), (-100, 50)]);
}

#[test]
fn encoder_counter_wraps_instead_of_overflowing() {
    let mut robot = robot_with(RobotConfig::default(), 100);
    robot.hal_mut().place_encoder(MOTOR_LEFT, i32::MIN + 150);
    for _ in 0..3 {
        robot.forward(100);
    }
    assert_eq!(robot.hal_mut().motor_position(MOTOR_LEFT), i32::MAX - 149);
    assert_eq!(robot.hal_mut().motor_position(MOTOR_RIGHT), -300);
}

#[test]
fn unmodelled_ports_read_zero_and_ignore_writes() {
    let mut config = RobotConfig::default();
    config.ports.sensor_left = 9;
    config.ports.sensor_right = 200;
    config.ports.motor_left = 12;
    let mut robot = robot_with(config, 100);

    robot.follow_line(80);
    assert_eq!(robot.hal_mut().motor_position(12), 0);
    assert_eq!(
        robot.hal().events(),
        &[
            HalEvent::Motor { port: 12, speed: 80 },
            HalEvent::Motor {
                port: MOTOR_RIGHT,
                speed: 80
            },
        ]
    );
}
