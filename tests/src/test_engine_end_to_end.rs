mod test_engine_end_to_end {
    use std::path::PathBuf;

    use cdc_engine::cache::DefaultTopicSelector;
    use cdc_engine::config::EngineConfig;
    use cdc_engine::event::Event;
    use cdc_engine::history::FileHistoryStore;
    use cdc_engine::processor::EventProcessor;
    use cdc_engine::schema::Value;
    use cdc_engine::sink::VecSink;
    use common::log::init_test_log;

    fn temp_history_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cdc_engine_it_{}_{}.jsonl", name, std::process::id()))
    }

    #[test]
    fn engine_survives_a_restart_against_a_real_history_file() {
        init_test_log();
        let path = temp_history_path("restart");
        std::fs::remove_file(&path).ok();

        {
            let config = EngineConfig { server_name: "shop".into(), history_path: path.to_string_lossy().into(), ..Default::default() };
            let history = FileHistoryStore::new(&path);
            let mut processor = EventProcessor::new(config, history, VecSink::new(), DefaultTopicSelector).unwrap();

            processor
                .process(Event::Query {
                    database: Some("shop".into()),
                    sql: "CREATE TABLE orders (id INT PRIMARY KEY, total DECIMAL(10,2))".into(),
                })
                .unwrap();
            processor
                .process(Event::Query {
                    database: Some("shop".into()),
                    sql: "ALTER TABLE orders ADD COLUMN note VARCHAR(64)".into(),
                })
                .unwrap();
        }

        let config = EngineConfig { server_name: "shop".into(), history_path: path.to_string_lossy().into(), ..Default::default() };
        let history = FileHistoryStore::new(&path);
        let mut processor = EventProcessor::new(config, history, VecSink::new(), DefaultTopicSelector).unwrap();
        processor.replay_history().unwrap();

        assert_eq!(processor.catalog().len(), 1);

        processor.process(Event::TableMap { table_number: 1, database: "shop".into(), table: "orders".into() }).unwrap();
        processor
            .process(Event::WriteRows {
                table_number: 1,
                rows: vec![vec![
                    Some(Value::Int32(1)),
                    Some(Value::Decimal("9.99".parse().unwrap())),
                    Some(Value::String("gift wrap".into())),
                ]],
            })
            .unwrap();

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn table_filter_loaded_from_toml_config_applies_end_to_end() {
        init_test_log();
        let toml = r#"
            server_name = "shop"
            history_path = "/tmp/cdc_engine_it_unused.jsonl"
            table_filter = "^shop\\.orders$"
        "#;
        let config: EngineConfig = toml::from_str(toml).unwrap();

        let mut processor =
            EventProcessor::new(config, cdc_engine::history::MemoryHistoryStore::new(), VecSink::new(), DefaultTopicSelector).unwrap();

        processor
            .process(Event::Query { database: Some("shop".into()), sql: "CREATE TABLE orders (id INT PRIMARY KEY)".into() })
            .unwrap();
        processor
            .process(Event::Query { database: Some("shop".into()), sql: "CREATE TABLE audit_log (id INT PRIMARY KEY)".into() })
            .unwrap();

        processor.process(Event::TableMap { table_number: 1, database: "shop".into(), table: "orders".into() }).unwrap();
        processor.process(Event::TableMap { table_number: 2, database: "shop".into(), table: "audit_log".into() }).unwrap();

        processor.process(Event::WriteRows { table_number: 1, rows: vec![vec![Some(Value::Int32(1))]] }).unwrap();
        processor.process(Event::WriteRows { table_number: 2, rows: vec![vec![Some(Value::Int32(1))]] }).unwrap();
    }

    #[test]
    fn schema_change_topic_emits_alongside_catalog_mutation() {
        init_test_log();
        let config = EngineConfig { server_name: "shop".into(), schema_change_topic_enabled: true, ..Default::default() };
        let mut processor =
            EventProcessor::new(config, cdc_engine::history::MemoryHistoryStore::new(), VecSink::new(), DefaultTopicSelector).unwrap();

        processor
            .process(Event::Query { database: Some("shop".into()), sql: "CREATE TABLE orders (id INT PRIMARY KEY)".into() })
            .unwrap();

        assert_eq!(processor.catalog().len(), 1);
        let records = processor.sink().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "shop.schema-changes");
    }
}
