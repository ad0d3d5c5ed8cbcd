//! # Integration Tests
//!
//! End-to-end export scenarios across every workspace crate.

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use contracts::{ContractError, FailurePolicy, RunPlan, SinkConfig, Track};
    use tempfile::{tempdir, TempDir};
    use tracklist_cli::commands::build_plan;
    use tracklist_cli::{Cli, CliError, Pipeline, PipelineConfig, RunStats};

    const HEADER: &str = "Track URI,Disc Number,Track Name,Album Name,Artist Name\n";

    const A_JSON: &str = concat!(
        r#"[{"artist_name":"ar1","track_name":"t1","album_name":"al1","spotfy_id":"id1"},"#,
        r#"{"artist_name":"ar2","track_name":"t2","album_name":"al2","spotfy_id":"id2"}]"#
    );
    const A_LINKS: &str =
        "https://open.spotify.com/track/id1\nhttps://open.spotify.com/track/id2\n";

    struct Fixture {
        input: TempDir,
        out: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                input: tempdir().unwrap(),
                out: tempdir().unwrap(),
            }
        }

        fn write_input(&self, name: &str, rows: &str) {
            fs::write(self.input.path().join(name), format!("{HEADER}{rows}")).unwrap();
        }

        fn cli(&self) -> Cli {
            Cli {
                dir: Some(self.input.path().display().to_string()),
                out: Some(self.out.path().to_path_buf()),
                json: true,
                link: true,
                ..Default::default()
            }
        }

        fn out(&self, relative: &str) -> std::path::PathBuf {
            self.out.path().join(relative)
        }

        fn read_out(&self, relative: &str) -> String {
            fs::read_to_string(self.out(relative)).unwrap()
        }
    }

    async fn run(cli: &Cli) -> Result<RunStats, CliError> {
        let plan = build_plan(cli)?;
        Pipeline::new(PipelineConfig::new(plan)).run().await
    }

    fn dir_names(path: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(path)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_both_sinks_exact_output() {
        let fx = Fixture::new();
        fx.write_input("a.csv", "id1,,t1,al1,ar1\nid2,,t2,al2,ar2\n");

        let stats = run(&fx.cli()).await.unwrap();

        assert!(stats.is_clean());
        assert_eq!(stats.run.total_records, 2);
        assert_eq!(fx.read_out("json/a.json"), A_JSON);
        assert_eq!(fx.read_out("links/a.txt"), A_LINKS);
        assert_eq!(dir_names(fx.out.path()), vec!["json", "links"]);
    }

    #[tokio::test]
    async fn test_json_decodes_back_to_tracks() {
        let fx = Fixture::new();
        fx.write_input("mix.csv", "id1,,t1,al1,ar1\nid2,,\"t, 2\",al2,ar2\n");

        run(&fx.cli()).await.unwrap();

        let tracks: Vec<Track> = serde_json::from_str(&fx.read_out("json/mix.json")).unwrap();
        assert_eq!(
            tracks,
            vec![
                Track::new("id1", "t1", "al1", "ar1"),
                Track::new("id2", "t, 2", "al2", "ar2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_row_order_preserved() {
        let fx = Fixture::new();
        let rows: String = (0..250)
            .map(|i| format!("id{i:03},,track {i},album,artist\n"))
            .collect();
        fx.write_input("long_list.csv", &rows);

        let stats = run(&fx.cli()).await.unwrap();
        assert_eq!(stats.run.total_records, 250);

        let links = fx.read_out("links/long_list.txt");
        let expected: String = (0..250)
            .map(|i| format!("https://open.spotify.com/track/id{i:03}\n"))
            .collect();
        assert_eq!(links, expected);
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let fx = Fixture::new();
        fx.write_input("a.csv", "id1,,t1,al1,ar1\nid2,,t2,al2,ar2\n");
        fx.write_input("b+c.csv", "id3,,t3,al3,ar3\n");

        run(&fx.cli()).await.unwrap();
        let first: Vec<Vec<u8>> = ["json/a.json", "json/b+c.json", "links/a.txt", "links/b+c.txt"]
            .iter()
            .map(|p| fs::read(fx.out(p)).unwrap())
            .collect();

        run(&fx.cli()).await.unwrap();
        let second: Vec<Vec<u8>> = ["json/a.json", "json/b+c.json", "links/a.txt", "links/b+c.txt"]
            .iter()
            .map(|p| fs::read(fx.out(p)).unwrap())
            .collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_matching_files_creates_nothing() {
        let fx = Fixture::new();
        fs::write(fx.input.path().join("readme.txt"), "hello").unwrap();
        fs::write(fx.input.path().join("my playlist.csv"), HEADER).unwrap();

        let stats = run(&fx.cli()).await.unwrap();

        assert_eq!(stats.run.files_parsed, 0);
        assert_eq!(stats.run.files_skipped, 2);
        assert!(dir_names(fx.out.path()).is_empty());
    }

    #[tokio::test]
    async fn test_only_matching_file_processed() {
        let fx = Fixture::new();
        fx.write_input("good.csv", "id1,,t1,al1,ar1\n");
        fs::write(fx.input.path().join("readme.txt"), "not a playlist").unwrap();

        let stats = run(&fx.cli()).await.unwrap();

        assert_eq!(stats.run.files_parsed, 1);
        assert_eq!(dir_names(&fx.out("json")), vec!["good.json"]);
        assert_eq!(dir_names(&fx.out("links")), vec!["good.txt"]);
    }

    #[tokio::test]
    async fn test_short_row_aborts_run() {
        let fx = Fixture::new();
        fx.write_input("a_ok.csv", "id1,,t1,al1,ar1\n");
        fx.write_input("b_bad.csv", "id2,,t2,al2,ar2\nid3,,t3,al3\n");
        fx.write_input("c_later.csv", "id4,,t4,al4,ar4\n");

        let err = run(&fx.cli()).await.unwrap_err();

        match err {
            CliError::Contract(ContractError::Format { path, row, .. }) => {
                assert_eq!(path, fx.input.path().join("b_bad.csv"));
                assert_eq!(row, Some(2));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(fx.out("json/a_ok.json").is_file());
        assert!(!fx.out("json/b_bad.json").exists());
        assert!(!fx.out("links/b_bad.txt").exists());
        assert!(!fx.out("json/c_later.json").exists());
        assert!(!fx.out("links/c_later.txt").exists());
    }

    #[tokio::test]
    async fn test_keep_going_continues_after_bad_file() {
        let fx = Fixture::new();
        fx.write_input("a_bad.csv", "id1,,t1\n");
        fx.write_input("b_good.csv", "id2,,t2,al2,ar2\n");

        let cli = Cli {
            keep_going: true,
            ..fx.cli()
        };
        let stats = run(&cli).await.unwrap();

        assert_eq!(stats.file_failures.len(), 1);
        assert!(matches!(
            stats.file_failures[0].error,
            ContractError::Format { .. }
        ));
        assert!(!stats.is_clean());
        assert_eq!(
            fx.read_out("links/b_good.txt"),
            "https://open.spotify.com/track/id2\n"
        );
        assert!(!fx.out("json/a_bad.json").exists());
    }

    #[tokio::test]
    async fn test_unset_dir_is_path_error() {
        let fx = Fixture::new();
        let cli = Cli {
            dir: None,
            ..fx.cli()
        };

        let err = run(&cli).await.unwrap_err();

        assert!(matches!(err, CliError::Contract(ContractError::Path { .. })));
        assert!(dir_names(fx.out.path()).is_empty());
    }

    #[tokio::test]
    async fn test_relative_dir_is_path_error() {
        let fx = Fixture::new();
        let cli = Cli {
            dir: Some("playlists".to_string()),
            ..fx.cli()
        };

        let err = run(&cli).await.unwrap_err();
        assert!(matches!(err, CliError::Contract(ContractError::Path { .. })));
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_stop_other_sink() {
        let fx = Fixture::new();
        fx.write_input("a.csv", "id1,,t1,al1,ar1\nid2,,t2,al2,ar2\n");
        fx.write_input("b.csv", "id3,,t3,al3,ar3\n");
        fs::write(fx.out("json"), "a file where the folder should be").unwrap();

        let cli = Cli {
            keep_going: true,
            ..fx.cli()
        };
        let stats = run(&cli).await.unwrap();

        let json = stats.sinks.iter().find(|s| s.name == "json").unwrap();
        let links = stats.sinks.iter().find(|s| s.name == "links").unwrap();
        assert_eq!(json.failures.len(), 2);
        assert!(links.is_clean());
        assert_eq!(fx.read_out("links/a.txt"), A_LINKS);
        assert_eq!(
            fx.read_out("links/b.txt"),
            "https://open.spotify.com/track/id3\n"
        );
    }

    #[tokio::test]
    async fn test_plan_file_drives_run() {
        let fx = Fixture::new();
        fx.write_input("a.csv", "id1,,t1,al1,ar1\nid2,,t2,al2,ar2\n");

        let plan_path = fx.out.path().join("plan.json");
        fs::write(
            &plan_path,
            serde_json::json!({
                "input_dir": fx.input.path(),
                "output_root": fx.out.path().join("exports"),
                "failure_policy": "continue",
                "sinks": [
                    { "name": "records", "sink_type": "json", "params": { "dir": "records", "pretty": "true" } },
                    { "name": "uris", "sink_type": "links", "queue_capacity": 1,
                      "params": { "dir": "uris", "link_prefix": "spotify:track:" } }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let cli = Cli {
            config: Some(plan_path),
            ..Default::default()
        };
        let plan: RunPlan = build_plan(&cli).unwrap();
        assert_eq!(plan.failure_policy, FailurePolicy::Continue);

        Pipeline::new(PipelineConfig::new(plan)).run().await.unwrap();

        assert_eq!(
            fx.read_out("exports/uris/a.txt"),
            "spotify:track:id1\nspotify:track:id2\n"
        );
        let pretty = fx.read_out("exports/records/a.json");
        assert!(pretty.starts_with("[\n  {\n"));
        let tracks: Vec<Track> = serde_json::from_str(&pretty).unwrap();
        assert_eq!(tracks.len(), 2);
    }

    #[test]
    fn test_duplicate_sink_folders_rejected() {
        let plan = RunPlan {
            input_dir: Some("/music".to_string()),
            sinks: vec![
                SinkConfig::json(),
                SinkConfig::links().with_param(contracts::PARAM_DIR, "json"),
            ],
            ..Default::default()
        };
        let err = config_loader::ConfigLoader::validate(&plan).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[tokio::test]
    async fn test_empty_file_writes_empty_outputs() {
        let fx = Fixture::new();
        fx.write_input("empty.csv", "");

        run(&fx.cli()).await.unwrap();

        assert_eq!(fx.read_out("json/empty.json"), "[]");
        assert_eq!(fx.read_out("links/empty.txt"), "");
    }

    #[tokio::test]
    async fn test_ids_written_verbatim() {
        let fx = Fixture::new();
        fx.write_input("odd.csv", " id1 ,,t1,al1,ar1\n,,t2,al2,ar2\n");

        let stats = run(&fx.cli()).await.unwrap();

        assert!(stats.is_clean());
        assert_eq!(
            fx.read_out("links/odd.txt"),
            "https://open.spotify.com/track/ id1 \nhttps://open.spotify.com/track/\n"
        );
    }
}
