use ccd_core::mocks::RecordingChannel;
use ccd_core::{Gain, IntegratorSpeed, Opcode, TimingController, TimingError, encode};
use ccd_traits::protocol::{DON, ERR};
use rstest::rstest;

#[test]
fn sgn_is_sent_strictly_before_cit() {
    let mut ctl = TimingController::new(RecordingChannel::new());
    ctl.apply_integral_time_and_gain(10.0, Gain::X2).unwrap();

    assert_eq!(ctl.channel().opcodes(), vec![Opcode::Sgn, Opcode::Cit]);
    let sent = ctl.channel().sent();
    assert_eq!(sent[0].args, vec![2, 0], "gain then speed (slow)");
    assert_eq!(sent[1].args, vec![encode(10.0).raw()]);
}

#[rstest]
#[case(4.499, IntegratorSpeed::Fast, 1)]
#[case(4.5, IntegratorSpeed::Slow, 0)]
#[case(0.5, IntegratorSpeed::Fast, 1)]
#[case(163.0, IntegratorSpeed::Slow, 0)]
fn speed_follows_integration_time(
    #[case] time_us: f64,
    #[case] speed: IntegratorSpeed,
    #[case] wire: u32,
) {
    let mut ctl = TimingController::new(RecordingChannel::new());
    ctl.apply_integral_time_and_gain(time_us, Gain::X10).unwrap();

    assert_eq!(ctl.channel().sent()[0].args, vec![10, wire]);
    assert_eq!(ctl.integration_state().speed(), Some(speed));
    assert_eq!(ctl.params().gain, Some(Gain::X10));
    assert_eq!(ctl.params().integration_time_us, Some(time_us));
}

#[test]
fn failed_sgn_never_sends_cit() {
    let channel = RecordingChannel::new().reply_to(Opcode::Sgn, ERR);
    let mut ctl = TimingController::new(channel);

    let err = ctl
        .apply_integral_time_and_gain(2.0, Gain::X1)
        .expect_err("SGN failure must abort");

    assert_eq!(ctl.channel().opcodes(), vec![Opcode::Sgn]);
    match &err {
        TimingError::DependencyAborted { opcode, source } => {
            assert_eq!(*opcode, Opcode::Cit);
            assert_eq!(
                **source,
                TimingError::CommandFailed {
                    opcode: Opcode::Sgn,
                    reply: ERR
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.reply(), Some(ERR));
    assert_eq!(ctl.integration_state().speed(), None);
    assert_eq!(ctl.params().gain, None);
    assert_eq!(ctl.params().integration_time_us, None);
}

#[test]
fn near_miss_sentinel_on_sgn_is_failure() {
    let channel = RecordingChannel::new().reply_to(Opcode::Sgn, DON ^ 0x0000_0100);
    let mut ctl = TimingController::new(channel);
    assert!(ctl.apply_integral_time_and_gain(10.0, Gain::X1).is_err());
    assert_eq!(ctl.channel().opcodes(), vec![Opcode::Sgn]);
}

#[test]
fn failed_cit_keeps_speed_from_sgn() {
    let mut ctl = TimingController::new(RecordingChannel::new().reply_to(Opcode::Cit, ERR));
    let err = ctl
        .apply_integral_time_and_gain(1.0, Gain::X5)
        .expect_err("CIT rejected");
    assert_eq!(
        err,
        TimingError::CommandFailed {
            opcode: Opcode::Cit,
            reply: ERR
        }
    );
    assert_eq!(ctl.channel().opcodes(), vec![Opcode::Sgn, Opcode::Cit]);
    assert_eq!(ctl.integration_state().speed(), Some(IntegratorSpeed::Fast));
    assert_eq!(ctl.params().gain, Some(Gain::X5));
    assert_eq!(ctl.params().integration_time_us, None);
}

#[test]
fn sgn_failure_leaves_previous_state() {
    let mut ctl = TimingController::new(RecordingChannel::new());
    ctl.apply_integral_time_and_gain(10.0, Gain::X2).unwrap();
    ctl.channel_mut().set_reply(Opcode::Sgn, ERR);

    assert!(ctl.apply_integral_time_and_gain(1.0, Gain::X1).is_err());
    assert_eq!(ctl.integration_state().speed(), Some(IntegratorSpeed::Slow));
    assert_eq!(ctl.params().gain, Some(Gain::X2));
    assert_eq!(ctl.params().integration_time_us, Some(10.0));
}

#[test]
fn gain_and_speed_alone_does_not_touch_state() {
    let mut ctl = TimingController::new(RecordingChannel::new());
    ctl.apply_gain_and_speed(Gain::X5, IntegratorSpeed::Fast)
        .unwrap();
    assert_eq!(ctl.channel().sent()[0].args, vec![5, 1]);
    assert_eq!(ctl.integration_state().speed(), None);
    assert_eq!(ctl.params().gain, None);
}

#[test]
fn clamped_time_is_recorded_as_applied() {
    let mut ctl = TimingController::new(RecordingChannel::new());
    ctl.apply_integral_time_and_gain(500.0, Gain::X1).unwrap();
    assert_eq!(ctl.params().integration_time_us, Some(163.0));
    assert_eq!(ctl.channel().sent()[1].args, vec![0x01FD_0000]);
    // Speed is chosen from the requested time.
    assert_eq!(ctl.integration_state().speed(), Some(IntegratorSpeed::Slow));
}
