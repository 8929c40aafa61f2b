//! Tests for the Rigol DS2000 driver.

use std::time::Duration;

use rstest::*;

use measurements::{Voltage, test_utils::assert_almost_eq};
use scpi_link::{InstrumentInterface, LinkError, LoopbackInterface};

use rigol_ds2000::{
    acquire::MemoryDepth,
    channel::Coupling,
    display::{MenuTime, Persistence},
    trigger::{
        ChannelSource, DataPattern, DelayCondition, EdgeSlope, I2cDirection, I2cWhen, Parity,
        PatternValue, Polarity, Rs232When, RuntCondition, SetupHoldType, SlopeWindow, Sweep,
        TimeCondition, Trigger, UsbWhen, VideoMode, VideoStandard, WidthCondition, WindowPosition,
    },
    waveform::{WaveformFormat, WaveformMode, WaveformSource},
    *,
};

// Type alias for the loopback interface with the DS2000 driver.
type Ds2000Lbk = Ds2000<LoopbackInterface>;

const ERR_QUERY: &str = ":SYSTEM:ERROR:NEXT?";
const NO_ERROR: &str = "0,\"No error\"";

/// Script a session where every command is followed by an empty error queue.
///
/// Each exchange is a command and, for queries, the reply of the instrument.
fn crt_inst(exchanges: Vec<(&str, Option<&str>)>) -> Ds2000Lbk {
    let mut host2inst = Vec::new();
    let mut inst2host: Vec<Vec<u8>> = Vec::new();
    for (cmd, reply) in exchanges {
        host2inst.push(cmd.to_string());
        if let Some(reply) = reply {
            inst2host.push(reply.as_bytes().to_vec());
        }
        host2inst.push(ERR_QUERY.to_string());
        inst2host.push(NO_ERROR.as_bytes().to_vec());
    }
    Ds2000::new(LoopbackInterface::new(host2inst, inst2host, "\n"))
}

/// Script a session from raw host and instrument messages, error queries included.
fn crt_inst_raw(host2inst: Vec<&str>, inst2host: Vec<&str>) -> Ds2000Lbk {
    Ds2000::new(LoopbackInterface::new(host2inst, inst2host, "\n"))
}

/// An interface that loses the link after a given number of writes.
struct FlakyLink {
    inner: LoopbackInterface,
    writes_left: usize,
}

impl InstrumentInterface for FlakyLink {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        self.inner.read_exact(buf)
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), LinkError> {
        if self.writes_left == 0 {
            return Err(LinkError::Io(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        self.writes_left -= 1;
        self.inner.write_raw(data)
    }
}

fn crt_flaky(host2inst: Vec<&str>, inst2host: Vec<&str>, writes: usize) -> Ds2000<FlakyLink> {
    let writes_left = writes;
    Ds2000::new(FlakyLink {
        inner: LoopbackInterface::new(host2inst, inst2host, "\n"),
        writes_left,
    })
}

#[fixture]
fn emp_inst() -> Ds2000Lbk {
    crt_inst(vec![])
}

/// Empty initialization should always pass and send nothing.
#[rstest]
fn test_initialization(emp_inst: Ds2000Lbk) {
    assert_eq!(emp_inst.trigger().active_mode(), None);
}

/// Get the name from the instrument.
#[rstest]
fn test_get_name() {
    let inst = crt_inst(vec![(
        "*IDN?",
        Some("RIGOL TECHNOLOGIES,DS2202,DS2A0000000001,00.00.01"),
    )]);
    assert_eq!(
        inst.get_name().unwrap(),
        "RIGOL TECHNOLOGIES,DS2202,DS2A0000000001,00.00.01"
    );
}

#[rstest]
fn test_get_info() {
    let inst = crt_inst(vec![(
        "*IDN?",
        Some("RIGOL TECHNOLOGIES,DS2202A,DS2D0000000001,00.03.05"),
    )]);
    let info = inst.get_info().unwrap();
    assert_eq!(info.model, "DS2202A");
    assert_eq!(info.firmware, "00.03.05");
}

/// Root commands are events without argument.
#[rstest]
fn test_root_commands() {
    let inst = crt_inst(vec![
        (":RUN", None),
        (":STOP", None),
        (":SINGLE", None),
        (":TFORCE", None),
        (":CLEAR", None),
        (":TLHALF", None),
    ]);
    inst.run().unwrap();
    inst.stop().unwrap();
    inst.single().unwrap();
    inst.force_trigger().unwrap();
    inst.clear().unwrap();
    inst.trigger_level_50().unwrap();
}

/// A SET is confirmed by an empty error queue.
#[rstest]
fn test_set_confirmed() {
    let inst = crt_inst(vec![(":CHANNEL1:SCALE 1.000000e+00", None)]);
    let ch = inst.get_channel(0).unwrap();
    ch.set_scale(Voltage::from_volts(1.0)).unwrap();
}

/// An entry in the error queue after a SET is reported with the command.
#[rstest]
fn test_set_instrument_error() {
    let inst = crt_inst_raw(
        vec![":CHANNEL1:SCALE 1.000000e+00", ERR_QUERY, ERR_QUERY],
        vec!["113,\"Undefined header\"", NO_ERROR],
    );
    let ch = inst.get_channel(0).unwrap();
    match ch.set_scale(Voltage::from_volts(1.0)) {
        Err(Ds2000Error::Instrument {
            command,
            code,
            message,
            stale,
        }) => {
            assert_eq!(command, ":CHANNEL1:SCALE 1.000000e+00");
            assert_eq!(code, 113);
            assert_eq!(message, "Undefined header");
            assert!(stale.is_empty());
        }
        other => panic!("Expected an instrument error, got {other:?}"),
    }
}

/// With several entries, the newest is reported and the older ones are attached as stale.
#[rstest]
fn test_query_instrument_error_with_stale_entries() {
    let inst = crt_inst_raw(
        vec![":ACQUIRE:MDEPTH?", ERR_QUERY, ERR_QUERY, ERR_QUERY],
        vec![
            "AUTO",
            "-221,\"Settings conflict\"",
            "-113,\"Undefined header\"",
            NO_ERROR,
        ],
    );
    match inst.acquire().get_memory_depth() {
        Err(Ds2000Error::Instrument { code, stale, .. }) => {
            assert_eq!(code, -113);
            assert_eq!(stale.len(), 1);
            assert_eq!(stale[0].code, -221);
        }
        other => panic!("Expected an instrument error, got {other:?}"),
    }
}

/// An error queue that never empties is given up on after the configured number of reads.
#[rstest]
fn test_queue_overflow() {
    let interface = LoopbackInterface::new(
        vec![":RUN", ERR_QUERY, ERR_QUERY],
        vec!["-113,\"Undefined header\"", "-113,\"Undefined header\""],
        "\n",
    );
    let inst = Ds2000::with_config(interface, ProtocolConfig::default().with_max_error_drain(2));
    assert!(matches!(
        inst.run(),
        Err(Ds2000Error::QueueOverflow { max_drain: 2 })
    ));
}

/// Stale entries can be drained explicitly.
#[rstest]
fn test_clear_error_queue() {
    let inst = crt_inst_raw(
        vec![ERR_QUERY, ERR_QUERY],
        vec!["-221,\"Settings conflict\"", NO_ERROR],
    );
    let stale = inst.clear_error_queue().unwrap();
    assert_eq!(
        stale,
        vec![ErrorQueueEntry {
            code: -221,
            message: "Settings conflict".to_string()
        }]
    );
}

/// A link that fails before the command is written makes the instrument unreachable.
#[rstest]
fn test_instrument_unreachable() {
    let inst = crt_flaky(vec![], vec![], 0);
    assert!(matches!(
        inst.run(),
        Err(Ds2000Error::InstrumentUnreachable { .. })
    ));
}

/// A link that fails during the error queue check leaves the command unconfirmed and the
/// trigger mode unknown.
#[rstest]
fn test_unconfirmed_mode_change_clears_tracked_mode() {
    let inst = crt_flaky(
        vec![":TRIGGER:MODE EDGE", ERR_QUERY, ":TRIGGER:MODE PULSE"],
        vec![NO_ERROR],
        3,
    );
    let trigger = inst.trigger();
    trigger.set_mode(TriggerMode::Edge).unwrap();
    match trigger.set_mode(TriggerMode::Pulse) {
        Err(Ds2000Error::Unconfirmed { command, source }) => {
            assert_eq!(command, ":TRIGGER:MODE PULSE");
            assert!(matches!(source, LinkError::Io(_)));
        }
        other => panic!("Expected an unconfirmed error, got {other:?}"),
    }
    assert_eq!(trigger.active_mode(), None);
}

/// Channel indices are zero based and limited to two channels.
#[rstest]
#[case(2)]
#[case(4)]
fn test_channel_index_out_of_range(emp_inst: Ds2000Lbk, #[case] idx: usize) {
    assert!(matches!(
        emp_inst.get_channel(idx),
        Err(Ds2000Error::ChannelIndexOutOfRange {
            nof_channels: 2,
            ..
        })
    ));
}

#[rstest]
#[case(0, ":CHANNEL1:SCALE?")]
#[case(1, ":CHANNEL2:SCALE?")]
fn test_channel_get_scale(#[case] idx: usize, #[case] cmd: &str) {
    let inst = crt_inst(vec![(cmd, Some("5.000000e-01"))]);
    let scale = inst.get_channel(idx).unwrap().get_scale().unwrap();
    assert_almost_eq(scale.as_volts(), 0.5);
}

#[rstest]
fn test_channel_settings() {
    let inst = crt_inst(vec![
        (":CHANNEL2:COUPLING AC", None),
        (":CHANNEL2:COUPLING?", Some("GND")),
        (":CHANNEL2:DISPLAY ON", None),
        (":CHANNEL2:DISPLAY?", Some("0")),
        (":CHANNEL2:PROBE 1.000000e+01", None),
    ]);
    let ch = inst.get_channel(1).unwrap();
    ch.set_coupling(Coupling::Ac).unwrap();
    assert_eq!(ch.get_coupling().unwrap(), Coupling::Gnd);
    ch.set_display(true).unwrap();
    assert!(!ch.get_display().unwrap());
    ch.set_probe(10.0).unwrap();
}

/// Invalid arguments are rejected before anything is sent.
#[rstest]
fn test_invalid_arguments_send_nothing(emp_inst: Ds2000Lbk) {
    let ch = emp_inst.get_channel(0).unwrap();
    assert!(ch.set_probe(3.0).is_err());
    assert!(ch.set_scale(Voltage::from_volts(-1.0)).is_err());
    assert!(emp_inst.acquire().set_averages(3).is_err());
    assert!(
        emp_inst
            .acquire()
            .set_memory_depth(MemoryDepth::Points(12_345))
            .is_err()
    );
    assert!(emp_inst.timebase().set_href_position(400).is_err());
    assert!(emp_inst.display().set_waveform_brightness(0).is_err());
    assert!(
        emp_inst
            .display()
            .set_persistence(Persistence::Time(Duration::from_secs(3)))
            .is_err()
    );
    assert!(emp_inst.ieee().set_ese(256).is_err());
    assert!(
        emp_inst
            .trigger()
            .set_holdoff(Duration::from_secs(11))
            .is_err()
    );
}

#[rstest]
fn test_acquire_memory_depth() {
    let inst = crt_inst(vec![
        (":ACQUIRE:MDEPTH 1400000", None),
        (":ACQUIRE:MDEPTH?", Some("AUTO")),
    ]);
    let acquire = inst.acquire();
    acquire
        .set_memory_depth(MemoryDepth::Points(1_400_000))
        .unwrap();
    assert_eq!(acquire.get_memory_depth().unwrap(), MemoryDepth::Auto);
}

#[rstest]
fn test_timebase_main_scale() {
    let inst = crt_inst(vec![
        (":TIMEBASE:MAIN:SCALE 1.000000e-06", None),
        (":TIMEBASE:MAIN:SCALE?", Some("2.000000e-03")),
    ]);
    let timebase = inst.timebase();
    timebase.set_main_scale(Duration::from_micros(1)).unwrap();
    let scale = timebase.get_main_scale().unwrap();
    assert!((scale.as_secs_f64() - 2e-3).abs() < 1e-12);
}

#[rstest]
fn test_display_persistence() {
    let inst = crt_inst(vec![
        (":DISPLAY:GRADING:TIME INFINITE", None),
        (":DISPLAY:GRADING:TIME?", Some("MIN")),
    ]);
    let display = inst.display();
    display.set_persistence(Persistence::Infinite).unwrap();
    assert_eq!(display.get_persistence().unwrap(), Persistence::Minimum);
}

#[rstest]
fn test_display_menu_time() {
    let inst = crt_inst(vec![
        (":DISPLAY:MPERSISTENCE 5", None),
        (":DISPLAY:MPERSISTENCE?", Some("INF")),
    ]);
    let display = inst.display();
    display.set_menu_time(MenuTime::Seconds(5)).unwrap();
    assert_eq!(display.get_menu_time().unwrap(), MenuTime::Infinite);
    assert!(display.set_menu_time(MenuTime::Seconds(3)).is_err());
}

/// The screenshot block may contain terminator bytes.
#[rstest]
fn test_display_screenshot() {
    let mut reply = b"#15".to_vec();
    reply.extend_from_slice(b"BM\n\x00\xff");
    let interface = LoopbackInterface::new(
        vec![":DISPLAY:DATA?", ERR_QUERY],
        vec![reply, NO_ERROR.as_bytes().to_vec()],
        "\n",
    );
    let inst = Ds2000::new(interface);
    assert_eq!(inst.display().screenshot().unwrap(), b"BM\n\x00\xff");
}

/// Selecting edge and then calling a pulse setter fails without sending anything.
#[rstest]
fn test_wrong_trigger_mode() {
    let inst = crt_inst(vec![(":TRIGGER:MODE EDGE", None)]);
    let trigger = inst.trigger();
    trigger.set_mode(TriggerMode::Edge).unwrap();
    match trigger.pulse().set_when(WidthCondition::PositiveGreater) {
        Err(Ds2000Error::WrongTriggerMode { active, required }) => {
            assert_eq!(active, Some(TriggerMode::Edge));
            assert_eq!(required, TriggerMode::Pulse);
        }
        other => panic!("Expected a wrong trigger mode error, got {other:?}"),
    }
}

type TriggerLbk = Trigger<LoopbackInterface>;

fn set_i2c_address(trigger: &TriggerLbk) -> Result<(), Ds2000Error> {
    trigger.i2c().set_address(3)
}

fn set_rs232_data(trigger: &TriggerLbk) -> Result<(), Ds2000Error> {
    trigger.rs232().set_data(3)
}

fn set_spi_data(trigger: &TriggerLbk) -> Result<(), Ds2000Error> {
    trigger.spi().set_data(3)
}

fn set_video_line(trigger: &TriggerLbk) -> Result<(), Ds2000Error> {
    trigger.video().set_line(3)
}

/// Setters that check their value against another setting fail in the wrong mode before
/// querying that setting.
#[rstest]
#[case::i2c_address(set_i2c_address, TriggerMode::I2c)]
#[case::rs232_data(set_rs232_data, TriggerMode::Rs232)]
#[case::spi_data(set_spi_data, TriggerMode::Spi)]
#[case::video_line(set_video_line, TriggerMode::Video)]
fn test_dependent_setter_in_wrong_mode_sends_nothing(
    #[case] setter: fn(&TriggerLbk) -> Result<(), Ds2000Error>,
    #[case] required_mode: TriggerMode,
) {
    let inst = crt_inst(vec![]);
    match setter(&inst.trigger()) {
        Err(Ds2000Error::WrongTriggerMode { active, required }) => {
            assert_eq!(active, None);
            assert_eq!(required, required_mode);
        }
        other => panic!("Expected a wrong trigger mode error, got {other:?}"),
    }

    let inst = crt_inst(vec![(":TRIGGER:MODE EDGE", None)]);
    let trigger = inst.trigger();
    trigger.set_mode(TriggerMode::Edge).unwrap();
    assert!(matches!(
        setter(&trigger),
        Err(Ds2000Error::WrongTriggerMode {
            active: Some(TriggerMode::Edge),
            ..
        })
    ));
}

/// In the right mode, the dependency is queried before the value is set.
#[rstest]
#[case::i2c_address(
    set_i2c_address,
    TriggerMode::I2c,
    ":TRIGGER:MODE IIC",
    ":TRIGGER:IIC:AWIDTH?",
    "7",
    ":TRIGGER:IIC:ADDRESS 3"
)]
#[case::rs232_data(
    set_rs232_data,
    TriggerMode::Rs232,
    ":TRIGGER:MODE RS232",
    ":TRIGGER:RS232:WIDTH?",
    "8",
    ":TRIGGER:RS232:DATA 3"
)]
#[case::spi_data(
    set_spi_data,
    TriggerMode::Spi,
    ":TRIGGER:MODE SPI",
    ":TRIGGER:SPI:WIDTH?",
    "8",
    ":TRIGGER:SPI:DATA 3"
)]
#[case::video_line(
    set_video_line,
    TriggerMode::Video,
    ":TRIGGER:MODE VIDEO",
    ":TRIGGER:VIDEO:STANDARD?",
    "NTSC",
    ":TRIGGER:VIDEO:LINE 3"
)]
fn test_dependent_setter_in_mode(
    #[case] setter: fn(&TriggerLbk) -> Result<(), Ds2000Error>,
    #[case] mode: TriggerMode,
    #[case] select: &str,
    #[case] dependency: &str,
    #[case] reply: &str,
    #[case] set: &str,
) {
    let inst = crt_inst(vec![(select, None), (dependency, Some(reply)), (set, None)]);
    let trigger = inst.trigger();
    trigger.set_mode(mode).unwrap();
    setter(&trigger).unwrap();
}

/// A value that does not fit the dependency is rejected after the dependency query only.
#[rstest]
fn test_i2c_address_exceeds_width() {
    let inst = crt_inst(vec![
        (":TRIGGER:MODE IIC", None),
        (":TRIGGER:IIC:AWIDTH?", Some("7")),
    ]);
    let trigger = inst.trigger();
    trigger.set_mode(TriggerMode::I2c).unwrap();
    assert!(matches!(
        trigger.i2c().set_address(200),
        Err(Ds2000Error::IntValueOutOfRange { max: 127, .. })
    ));
}

fn exercise_runt(trigger: &TriggerLbk) {
    let runt = trigger.runt();
    runt.select().unwrap();
    runt.set_polarity(Polarity::Negative).unwrap();
    assert_eq!(runt.get_when().unwrap(), RuntCondition::Between);
}

fn exercise_window(trigger: &TriggerLbk) {
    let window = trigger.window();
    window.select().unwrap();
    window.set_position(WindowPosition::Enter).unwrap();
    assert_eq!(window.get_slope().unwrap(), EdgeSlope::Either);
}

fn exercise_nth_edge(trigger: &TriggerLbk) {
    let nth_edge = trigger.nth_edge();
    nth_edge.select().unwrap();
    nth_edge.set_edge(3).unwrap();
    assert_eq!(nth_edge.get_slope().unwrap(), Polarity::Negative);
}

fn exercise_slope(trigger: &TriggerLbk) {
    let slope = trigger.slope();
    slope.select().unwrap();
    slope.set_window(SlopeWindow::Both).unwrap();
    assert_eq!(slope.get_when().unwrap(), WidthCondition::PositiveGreater);
}

fn exercise_video(trigger: &TriggerLbk) {
    let video = trigger.video();
    video.select().unwrap();
    video.set_mode(VideoMode::Line).unwrap();
    assert_eq!(video.get_standard().unwrap(), VideoStandard::Ntsc);
}

fn exercise_pattern(trigger: &TriggerLbk) {
    let pattern = trigger.pattern();
    pattern.select().unwrap();
    pattern
        .set_pattern(PatternValue::High, PatternValue::Rising)
        .unwrap();
    let level = pattern.get_level(ChannelSource::Channel1).unwrap();
    assert_almost_eq(level.as_volts(), 1.5);
}

fn exercise_delay(trigger: &TriggerLbk) {
    let delay = trigger.delay();
    delay.select().unwrap();
    delay.set_condition(DelayCondition::Outside).unwrap();
    assert_eq!(delay.get_source_b().unwrap(), ChannelSource::Channel2);
}

fn exercise_timeout(trigger: &TriggerLbk) {
    let timeout = trigger.timeout();
    timeout.select().unwrap();
    timeout.set_slope(EdgeSlope::Falling).unwrap();
    assert_eq!(timeout.get_source().unwrap(), ChannelSource::Channel1);
}

fn exercise_duration(trigger: &TriggerLbk) {
    let duration = trigger.duration();
    duration.select().unwrap();
    duration.set_when(TimeCondition::Greater).unwrap();
    assert_eq!(duration.get_source().unwrap(), ChannelSource::Channel2);
}

fn exercise_setup_hold(trigger: &TriggerLbk) {
    let setup_hold = trigger.setup_hold();
    setup_hold.select().unwrap();
    setup_hold.set_violation(SetupHoldType::SetupHold).unwrap();
    assert_eq!(setup_hold.get_pattern().unwrap(), DataPattern::Low);
}

fn exercise_rs232(trigger: &TriggerLbk) {
    let rs232 = trigger.rs232();
    rs232.select().unwrap();
    rs232.set_parity(Parity::Odd).unwrap();
    assert_eq!(rs232.get_when().unwrap(), Rs232When::ParityError);
}

fn exercise_i2c(trigger: &TriggerLbk) {
    let i2c = trigger.i2c();
    i2c.select().unwrap();
    i2c.set_direction(I2cDirection::ReadWrite).unwrap();
    assert_eq!(i2c.get_when().unwrap(), I2cWhen::AddressData);
}

fn exercise_spi(trigger: &TriggerLbk) {
    let spi = trigger.spi();
    spi.select().unwrap();
    spi.set_width(16).unwrap();
    assert_eq!(spi.get_slope().unwrap(), Polarity::Positive);
}

fn exercise_usb(trigger: &TriggerLbk) {
    let usb = trigger.usb();
    usb.select().unwrap();
    usb.set_when(UsbWhen::EndOfPacket).unwrap();
    assert_eq!(usb.get_dplus_source().unwrap(), ChannelSource::Channel1);
}

/// Every mode façade selects its mode and reaches its own subtree.
#[rstest]
#[case::runt(
    exercise_runt,
    ":TRIGGER:MODE RUNT",
    ":TRIGGER:RUNT:POLARITY NEGATIVE",
    ":TRIGGER:RUNT:WHEN?",
    "GLES"
)]
#[case::window(
    exercise_window,
    ":TRIGGER:MODE WIND",
    ":TRIGGER:WINDOWS:POSITION ENTER",
    ":TRIGGER:WINDOWS:SLOPE?",
    "RFAL"
)]
#[case::nth_edge(
    exercise_nth_edge,
    ":TRIGGER:MODE NEDG",
    ":TRIGGER:NEDGE:EDGE 3",
    ":TRIGGER:NEDGE:SLOPE?",
    "NEG"
)]
#[case::slope(
    exercise_slope,
    ":TRIGGER:MODE SLOPE",
    ":TRIGGER:SLOPE:WINDOW TAB",
    ":TRIGGER:SLOPE:WHEN?",
    "PGR"
)]
#[case::video(
    exercise_video,
    ":TRIGGER:MODE VIDEO",
    ":TRIGGER:VIDEO:MODE LINE",
    ":TRIGGER:VIDEO:STANDARD?",
    "NTSC"
)]
#[case::pattern(
    exercise_pattern,
    ":TRIGGER:MODE PATTERN",
    ":TRIGGER:PATTERN:PATTERN H,R",
    ":TRIGGER:PATTERN:LEVEL? CHANNEL1",
    "1.500000e+00"
)]
#[case::delay(
    exercise_delay,
    ":TRIGGER:MODE DELAY",
    ":TRIGGER:DELAY:TYPE GOUT",
    ":TRIGGER:DELAY:SB?",
    "CHAN2"
)]
#[case::timeout(
    exercise_timeout,
    ":TRIGGER:MODE TIMEOUT",
    ":TRIGGER:TIMEOUT:SLOPE NEGATIVE",
    ":TRIGGER:TIMEOUT:SOURCE?",
    "CHAN1"
)]
#[case::duration(
    exercise_duration,
    ":TRIGGER:MODE DURATION",
    ":TRIGGER:DURATION:WHEN GREATER",
    ":TRIGGER:DURATION:SOURCE?",
    "CHAN2"
)]
#[case::setup_hold(
    exercise_setup_hold,
    ":TRIGGER:MODE SHOLD",
    ":TRIGGER:SHOLD:TYPE SETHOLD",
    ":TRIGGER:SHOLD:PATTERN?",
    "L"
)]
#[case::rs232(
    exercise_rs232,
    ":TRIGGER:MODE RS232",
    ":TRIGGER:RS232:PARITY ODD",
    ":TRIGGER:RS232:WHEN?",
    "PAR"
)]
#[case::i2c(
    exercise_i2c,
    ":TRIGGER:MODE IIC",
    ":TRIGGER:IIC:DIRECTION RWRITE",
    ":TRIGGER:IIC:WHEN?",
    "ADAT"
)]
#[case::spi(
    exercise_spi,
    ":TRIGGER:MODE SPI",
    ":TRIGGER:SPI:WIDTH 16",
    ":TRIGGER:SPI:SLOPE?",
    "POS"
)]
#[case::usb(
    exercise_usb,
    ":TRIGGER:MODE USB",
    ":TRIGGER:USB:WHEN EOP",
    ":TRIGGER:USB:DPLUS?",
    "CHAN1"
)]
fn test_trigger_mode_settings(
    #[case] exercise: fn(&TriggerLbk),
    #[case] select: &str,
    #[case] set: &str,
    #[case] get: &str,
    #[case] reply: &str,
) {
    let inst = crt_inst(vec![(select, None), (set, None), (get, Some(reply))]);
    exercise(&inst.trigger());
}

/// Two edges in one pattern are rejected before anything is sent.
#[rstest]
fn test_pattern_with_two_edges(emp_inst: Ds2000Lbk) {
    assert!(matches!(
        emp_inst
            .trigger()
            .pattern()
            .set_pattern(PatternValue::Rising, PatternValue::Falling),
        Err(Ds2000Error::InvalidArgument(_))
    ));
}

/// Without a known trigger mode, mode setters fail.
#[rstest]
fn test_trigger_setter_without_tracked_mode(emp_inst: Ds2000Lbk) {
    assert!(matches!(
        emp_inst.trigger().edge().set_slope(EdgeSlope::Falling),
        Err(Ds2000Error::WrongTriggerMode { active: None, .. })
    ));
}

/// Getters of inactive modes are allowed.
#[rstest]
fn test_trigger_getter_of_inactive_mode() {
    let inst = crt_inst(vec![
        (":TRIGGER:MODE EDGE", None),
        (":TRIGGER:PULSE:WHEN?", Some("NGL")),
    ]);
    let trigger = inst.trigger();
    trigger.set_mode(TriggerMode::Edge).unwrap();
    assert_eq!(
        trigger.pulse().get_when().unwrap(),
        WidthCondition::NegativeBetween
    );
}

/// A mode façade can select its own mode.
#[rstest]
fn test_trigger_mode_select() {
    let inst = crt_inst(vec![
        (":TRIGGER:MODE PULSE", None),
        (":TRIGGER:PULSE:WHEN PGREATER", None),
    ]);
    let pulse = inst.trigger().pulse();
    assert!(!pulse.is_active());
    pulse.select().unwrap();
    assert!(pulse.is_active());
    pulse.set_when(WidthCondition::PositiveGreater).unwrap();
}

/// A reset puts the instrument into edge trigger mode.
#[rstest]
fn test_reset_tracks_edge_mode() {
    let inst = crt_inst(vec![
        ("*RST", None),
        (":TRIGGER:EDGE:SLOPE NEGATIVE", None),
    ]);
    inst.reset().unwrap();
    assert_eq!(inst.trigger().active_mode(), Some(TriggerMode::Edge));
    inst.trigger().edge().set_slope(EdgeSlope::Falling).unwrap();
}

/// A rejected mode change keeps the previously tracked mode.
#[rstest]
fn test_rejected_mode_change_keeps_mode() {
    let inst = crt_inst_raw(
        vec![
            ":TRIGGER:MODE EDGE",
            ERR_QUERY,
            ":TRIGGER:MODE USB",
            ERR_QUERY,
            ERR_QUERY,
        ],
        vec![NO_ERROR, "-221,\"Settings conflict\"", NO_ERROR],
    );
    let trigger = inst.trigger();
    trigger.set_mode(TriggerMode::Edge).unwrap();
    assert!(matches!(
        trigger.set_mode(TriggerMode::Usb),
        Err(Ds2000Error::Instrument { code: -221, .. })
    ));
    assert_eq!(trigger.active_mode(), Some(TriggerMode::Edge));
}

/// Autoscale makes the trigger mode unknown.
#[rstest]
fn test_autoscale_forgets_mode() {
    let inst = crt_inst(vec![("*RST", None), (":AUTOSCALE", None)]);
    inst.reset().unwrap();
    inst.autoscale().unwrap();
    assert_eq!(inst.trigger().active_mode(), None);
}

/// Querying the mode syncs the tracked mode.
#[rstest]
fn test_get_mode_syncs_tracked_mode() {
    let inst = crt_inst(vec![(":TRIGGER:MODE?", Some("SLOP"))]);
    let trigger = inst.trigger();
    assert_eq!(trigger.get_mode().unwrap(), TriggerMode::Slope);
    assert_eq!(trigger.active_mode(), Some(TriggerMode::Slope));
    assert!(trigger.slope().is_active());
}

#[rstest]
fn test_trigger_sweep() {
    let inst = crt_inst(vec![
        (":TRIGGER:SWEEP SINGLE", None),
        (":TRIGGER:SWEEP?", Some("AUTO")),
    ]);
    let trigger = inst.trigger();
    trigger.set_sweep(Sweep::Single).unwrap();
    assert_eq!(trigger.get_sweep().unwrap(), Sweep::Auto);
}

/// Decode a byte waveform and scale it with its preamble.
#[rstest]
fn test_read_waveform() {
    let mut data = b"#210".to_vec();
    data.extend([128, 130, 10, 128, 128, 128, 128, 128, 128, 255]);
    let interface = LoopbackInterface::new(
        vec![
            ":WAVEFORM:SOURCE CHANNEL2",
            ERR_QUERY,
            ":WAVEFORM:PREAMBLE?",
            ERR_QUERY,
            ":WAVEFORM:DATA?",
            ERR_QUERY,
        ],
        vec![
            NO_ERROR.as_bytes().to_vec(),
            b"1,0,10,1,1.000000e-06,0,0,4.000000e-02,0,128".to_vec(),
            NO_ERROR.as_bytes().to_vec(),
            data,
            NO_ERROR.as_bytes().to_vec(),
        ],
        "\n",
    );
    let inst = Ds2000::new(interface);
    let samples = inst
        .waveform()
        .read_waveform(WaveformSource::Channel2)
        .unwrap();
    assert_eq!(samples.len(), 10);
    assert_eq!(samples.preamble().format, WaveformFormat::Byte);

    let points: Vec<_> = samples.collect();
    assert_almost_eq(points[1].time, 1e-6);
    assert_almost_eq(points[1].voltage.as_volts(), 0.08);
    assert_almost_eq(points[2].voltage.as_volts(), -4.72);
    assert_almost_eq(points[9].voltage.as_volts(), 5.08);
}

/// A block with fewer samples than announced is rejected.
#[rstest]
fn test_read_waveform_point_count_mismatch() {
    let mut data = b"#19".to_vec();
    data.extend([128; 9]);
    let interface = LoopbackInterface::new(
        vec![
            ":WAVEFORM:SOURCE CHANNEL1",
            ERR_QUERY,
            ":WAVEFORM:PREAMBLE?",
            ERR_QUERY,
            ":WAVEFORM:DATA?",
            ERR_QUERY,
        ],
        vec![
            NO_ERROR.as_bytes().to_vec(),
            b"1,0,10,1,1.000000e-06,0,0,4.000000e-02,0,128".to_vec(),
            NO_ERROR.as_bytes().to_vec(),
            data,
            NO_ERROR.as_bytes().to_vec(),
        ],
        "\n",
    );
    let inst = Ds2000::new(interface);
    assert!(matches!(
        inst.waveform().read_waveform(WaveformSource::Channel1),
        Err(Ds2000Error::PointCountMismatch {
            expected: 10,
            actual: 9
        })
    ));
}

/// The internal memory is read in chunks until the instrument reports idle.
#[rstest]
fn test_read_memory_waveform() {
    let inst = crt_inst(vec![
        (":ACQUIRE:MDEPTH?", Some("10")),
        (":STOP", None),
        (":WAVEFORM:SOURCE CHANNEL1", None),
        (":WAVEFORM:MODE RAW", None),
        (":WAVEFORM:RESET", None),
        (":WAVEFORM:START 1", None),
        (":WAVEFORM:STOP 10", None),
        (
            ":WAVEFORM:PREAMBLE?",
            Some("1,2,10,1,1.000000e-06,0,0,4.000000e-02,0,128"),
        ),
        (":WAVEFORM:BEGIN", None),
        (":WAVEFORM:STATUS?", Some("READ,6")),
        (":WAVEFORM:DATA?", Some("#16@@@@@@")),
        (":WAVEFORM:STATUS?", Some("IDLE,10")),
        (":WAVEFORM:DATA?", Some("#14PPPP")),
        (":WAVEFORM:END", None),
    ]);
    let samples = inst
        .waveform()
        .read_memory_waveform(WaveformSource::Channel1)
        .unwrap();
    assert_eq!(samples.len(), 10);
    assert_eq!(samples.preamble().mode, WaveformMode::Raw);

    let points: Vec<_> = samples.collect();
    assert_almost_eq(points[0].voltage.as_volts(), -2.56);
    assert_almost_eq(points[5].voltage.as_volts(), -2.56);
    assert_almost_eq(points[6].voltage.as_volts(), -1.92);
    assert_almost_eq(points[9].time, 9e-6);
}

/// Reading the internal memory needs a fixed memory depth.
#[rstest]
fn test_read_memory_waveform_auto_depth() {
    let inst = crt_inst(vec![(":ACQUIRE:MDEPTH?", Some("AUTO"))]);
    assert!(matches!(
        inst.waveform()
            .read_memory_waveform(WaveformSource::Channel1),
        Err(Ds2000Error::InvalidArgument(_))
    ));
}

#[rstest]
fn test_ieee_commands() {
    let inst = crt_inst(vec![
        ("*CLS", None),
        ("*ESE 32", None),
        ("*ESR?", Some("0")),
        ("*OPC?", Some("1")),
        ("*TST?", Some("0")),
        ("*WAI", None),
    ]);
    let ieee = inst.ieee();
    ieee.cls().unwrap();
    ieee.set_ese(32).unwrap();
    assert_eq!(ieee.esr().unwrap(), 0);
    assert!(ieee.is_operation_complete().unwrap());
    assert_eq!(ieee.tst().unwrap(), 0);
    ieee.wai().unwrap();
}

/// Ensure cloning an instrument and a channel shares the connection and the tracked mode.
#[rstest]
fn test_clone_shares_session() {
    let inst = crt_inst(vec![("*RST", None)]);
    let inst2 = inst.clone();
    inst2.reset().unwrap();
    assert_eq!(inst.trigger().active_mode(), Some(TriggerMode::Edge));
}
