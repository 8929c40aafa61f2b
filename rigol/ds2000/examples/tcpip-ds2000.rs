use std::time::Duration;

use measurements::Voltage;
use scpi_link::TcpIpInterface;

use rigol_ds2000::{
    Ds2000, TriggerMode,
    trigger::{EdgeSlope, EdgeSource},
    waveform::{WaveformFormat, WaveformMode, WaveformSource},
};

fn main() {
    // Rigol oscilloscopes accept raw SCPI on port 5555.
    let interface = TcpIpInterface::try_new("192.168.1.20:5555").unwrap();

    // Now we can open the DS2000 with the TCP/IP interface.
    let scope = Ds2000::new(interface);
    println!("Instrument: {}", scope.get_info().unwrap());

    // Anything that piled up in the error queue before we connected.
    for entry in scope.clear_error_queue().unwrap() {
        println!("Stale error: {entry}");
    }

    // Set up channel 1
    let ch1 = scope.get_channel(0).unwrap();
    ch1.set_display(true).unwrap();
    ch1.set_scale(Voltage::from_millivolts(200.0)).unwrap();
    scope
        .timebase()
        .set_main_scale(Duration::from_micros(10))
        .unwrap();

    // Trigger on the rising edge of channel 1
    let trigger = scope.trigger();
    trigger.set_mode(TriggerMode::Edge).unwrap();
    let edge = trigger.edge();
    edge.set_source(EdgeSource::Channel1).unwrap();
    edge.set_slope(EdgeSlope::Rising).unwrap();
    edge.set_level(Voltage::from_millivolts(100.0)).unwrap();

    // Setting a pulse parameter now is refused without talking to the instrument.
    let refused = trigger.pulse().set_level(Voltage::from_volts(0.5));
    println!("Pulse level while in edge mode: {refused:?}");

    // Capture once and read what is on screen
    scope.single().unwrap();
    let waveform = scope.waveform();
    waveform.set_mode(WaveformMode::Normal).unwrap();
    waveform.set_format(WaveformFormat::Byte).unwrap();
    let samples = waveform.read_waveform(WaveformSource::Channel1).unwrap();
    println!("Read {} points", samples.len());
    for point in samples.take(10) {
        println!("{:e} s: {:.3} V", point.time, point.voltage.as_volts());
    }
}
