use flume::Receiver;
use racesim::interfaces::presenter_interface::RaceFrame;
use racesim::post::race_result::{EventKind, LapFrame, QualifyingResult, RaceResult};
use std::thread::sleep;
use std::time::Duration;

/// present_frames prints the frames received from the simulator thread until the final result
/// arrives (or the simulator hangs up). Lap frames are paced by `lap_delay`.
pub fn present_frames(rx: &Receiver<RaceFrame>, lap_delay: Duration) {
    for frame in rx.iter() {
        match frame {
            RaceFrame::Qualifying(qualifying) => print_qualifying(&qualifying),
            RaceFrame::Lap(lap_frame) => {
                print_lap(&lap_frame);
                if !lap_delay.is_zero() {
                    sleep(lap_delay);
                }
            }
            RaceFrame::Finished(result) => {
                print_final_result(&result);
                return;
            }
        }
    }
}

fn print_qualifying(qualifying: &QualifyingResult) {
    println!("QUALIFYING - {}", qualifying.track_name);
    for entry in qualifying.classification.iter() {
        let mut remarks = String::new();
        if entry.car_issue {
            remarks.push_str(" (car issue)");
        }
        if entry.grid_penalty > 0 {
            remarks.push_str(&format!(" (grid penalty: {} places)", entry.grid_penalty));
        }
        println!(
            "{:2}. {:<12} {:<10} {:8.3}s  +{:.3}s{}",
            entry.position, entry.driver, entry.car, entry.laptime, entry.gap_to_pole, remarks
        );
    }
    println!("Starting grid: {}", qualifying.grid.join(", "));
    println!();
}

fn print_lap(lap_frame: &LapFrame) {
    println!("LAP {}", lap_frame.lap);
    for standing in lap_frame.standings.iter() {
        println!(
            "{:2}. {:<12} {:8.3}s  +{:.3}s",
            standing.position, standing.driver, standing.last_laptime, standing.gap_to_leader
        );
    }
    for event in lap_frame.events.iter() {
        println!("    {}", event);
    }
    println!();
}

fn print_final_result(result: &RaceResult) {
    println!("RESULT - {} ({} laps)", result.track_name, result.tot_no_laps);
    for standing in result.final_standings.iter() {
        println!(
            "{:2}. {:<12} {:<10} {:9.3}s  +{:.3}s",
            standing.position,
            standing.driver,
            standing.car,
            standing.total_time,
            standing.gap_to_leader
        );
    }
    if let Some(fastest_lap) = &result.fastest_lap {
        println!(
            "Fastest lap: {} with {:.3}s on lap {}",
            fastest_lap.driver, fastest_lap.laptime, fastest_lap.lap
        );
    }

    let no_passes = result
        .events()
        .filter(|event| matches!(event.kind, EventKind::Overtake | EventKind::FlyPast))
        .count();
    let no_incidents = result
        .events()
        .filter(|event| matches!(event.kind, EventKind::CarIssue | EventKind::DriverMistake))
        .count();
    println!("Passes: {}, incidents: {}", no_passes, no_incidents);
}
