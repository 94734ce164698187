#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todoer::libs::data_storage::DataStorage;
    use todoer::libs::config::{BackendConfig, Config, CONFIG_FILE_NAME, DEFAULT_TABLE, ENV_ANON_KEY, ENV_API_URL, ENV_TABLE};

    /// Gives each test its own config file location.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        config_path: PathBuf,
        api_url: String,
        anon_key: String,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config_path = temp_dir.path().join("todoer").join(CONFIG_FILE_NAME);
            ConfigTestContext {
                _temp_dir: temp_dir,
                config_path,
                api_url: "https://xyz.supabase.co".to_string(),
                anon_key: "anon-key-123".to_string(),
            }
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.backend.is_none());
        assert!(config.backend().is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let config = Config {
            backend: Some(BackendConfig::new(&ctx.api_url, &ctx.anon_key)),
        };

        config.save_to(&ctx.config_path).unwrap();
        let read_config = Config::read_from(&ctx.config_path).unwrap();

        assert_eq!(read_config, config);
        let backend = read_config.backend().unwrap();
        assert_eq!(backend.api_url, ctx.api_url);
        assert_eq!(backend.table, DEFAULT_TABLE);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_table_defaults_when_missing_from_file(ctx: &mut ConfigTestContext) {
        fs::create_dir_all(ctx.config_path.parent().unwrap()).unwrap();
        fs::write(
            &ctx.config_path,
            format!(r#"{{"backend":{{"api_url":"{}","anon_key":"{}"}}}}"#, ctx.api_url, ctx.anon_key),
        )
        .unwrap();

        let backend = Config::read_from(&ctx.config_path).unwrap().backend().unwrap();
        assert_eq!(backend.table, "tasks");
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_corrupted_config_is_an_error(ctx: &mut ConfigTestContext) {
        fs::create_dir_all(ctx.config_path.parent().unwrap()).unwrap();
        fs::write(&ctx.config_path, "{ not json").unwrap();

        assert!(Config::read_from(&ctx.config_path).is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_environment_creates_backend(ctx: &mut ConfigTestContext) {
        let config = Config::default().with_overrides(lookup(&[(ENV_API_URL, ctx.api_url.as_str()), (ENV_ANON_KEY, ctx.anon_key.as_str())]));

        let backend = config.backend().unwrap();
        assert_eq!(backend, BackendConfig::new(&ctx.api_url, &ctx.anon_key));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_environment_overrides_file_values(ctx: &mut ConfigTestContext) {
        Config {
            backend: Some(BackendConfig::new(&ctx.api_url, &ctx.anon_key)),
        }
        .save_to(&ctx.config_path)
        .unwrap();

        let config = Config::read_from(&ctx.config_path)
            .unwrap()
            .with_overrides(lookup(&[(ENV_TABLE, "todos"), (ENV_ANON_KEY, "other-key")]));

        let backend = config.backend().unwrap();
        assert_eq!(backend.api_url, ctx.api_url);
        assert_eq!(backend.anon_key, "other-key");
        assert_eq!(backend.table, "todos");
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let config = Config::default().with_overrides(lookup(&[(ENV_API_URL, ""), (ENV_ANON_KEY, "  ")]));
        assert!(config.backend.is_none());
    }

    #[test]
    fn test_incomplete_backend_is_rejected() {
        let config = Config::default().with_overrides(lookup(&[(ENV_API_URL, "https://xyz.supabase.co")]));

        assert!(config.backend.is_some());
        assert!(config.backend().is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_data_storage_creates_base_directory(ctx: &mut ConfigTestContext) {
        let base = ctx.config_path.parent().unwrap().to_path_buf();
        let storage = DataStorage::at(&base);
        assert!(!base.exists());

        let path = storage.get_path(CONFIG_FILE_NAME).unwrap();

        assert!(storage.base_path().is_dir());
        assert_eq!(path, ctx.config_path);
    }
}
