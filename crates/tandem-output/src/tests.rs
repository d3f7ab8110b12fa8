//! Integration tests for tandem-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{RobotSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(agent_id: u32, tick: u64) -> RobotSnapshotRow {
        RobotSnapshotRow {
            tick,
            agent_id,
            team:     "red",
            x:        agent_id as i32,
            y:        3,
            facing:   'W',
            carrying: agent_id % 2 == 1,
            partner:  u32::MAX,
        }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow { tick, red_credits: 2, blue_credits: 1, gold_remaining: 47, faults: 0, messages: 5 }
    }

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("robot_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn missing_output_dir_is_created() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("robot_snapshots.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(dir.path().join("robot_snapshots.csv")),
            ["tick", "agent_id", "team", "x", "y", "facing", "carrying", "partner"]
        );
        assert_eq!(
            headers(dir.path().join("tick_summaries.csv")),
            ["tick", "red_credits", "blue_credits", "gold_remaining", "faults", "messages"]
        );
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("robot_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5");           // tick
        assert_eq!(&rows[1][1], "1");           // agent_id
        assert_eq!(&rows[1][2], "red");
        assert_eq!(&rows[1][5], "W");
        assert_eq!(&rows[1][6], "1");           // carrying
        assert_eq!(&rows[2][7], "4294967295");  // unpaired
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][1], "2");
        assert_eq!(&rows[0][3], "47");
        assert_eq!(&rows[0][5], "5");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tandem_core::{ArenaConfig, Direction, GridConfig, Position, Team};
    use tandem_sim::SimBuilder;

    use crate::{CsvWriter, SimOutputObserver};

    #[test]
    fn integration_csv() {
        let config = ArenaConfig {
            grid: GridConfig { width: 5, height: 5, wrap: false },
            robots_per_team: 0,
            gold_units: 0,
            total_ticks: 6,
            output_interval_ticks: 2,
            ..ArenaConfig::default()
        };
        let mut sim = SimBuilder::new(config)
            .robot(Team::Red, Position::new(2, 1), Direction::South)
            .robot(Team::Blue, Position::new(2, 3), Direction::North)
            .gold(Position::new(2, 2), 3)
            .build()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run_to_end(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // Snapshots at ticks 0, 2, 4: 3 ticks × 2 robots.
        let mut rdr = csv::Reader::from_path(dir.path().join("robot_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[0][2], "red");
        assert_eq!(&rows[1][2], "blue");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[5][0], "5");
        assert_eq!(&rows[5][3], "3");
    }
}
