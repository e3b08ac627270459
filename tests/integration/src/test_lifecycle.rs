//! Out-of-band lifecycle step of the data stack.

#[cfg(all(test, unix))]
mod tests {
    use std::path::Path;

    use ovhstack_cloud::LocalCloudProvider;
    use ovhstack_core::{InMemoryOutputStore, StackConfig};
    use ovhstack_s3_core::LifecycleError;
    use ovhstack_stacks::{DataStack, DeployError, get_data_stack_output};

    use crate::{deploy_project, init_tracing, write_fake_cli, write_rule_file};

    fn lifecycle_config(dir: &Path, exit_code: i32) -> StackConfig {
        init_tracing();
        StackConfig::builder()
            .environment(Some("prod".to_owned()))
            .lifecycle_cli(
                write_fake_cli(dir, exit_code)
                    .unwrap()
                    .display()
                    .to_string(),
            )
            .lifecycle_file(write_rule_file(dir).unwrap().display().to_string())
            .build()
    }

    #[tokio::test]
    async fn test_should_apply_lifecycle_with_owner_credential() {
        let dir = tempfile::tempdir().unwrap();
        let config = lifecycle_config(dir.path(), 0);
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        deploy_project(&config, &provider, &outputs).await.unwrap();

        let output = DataStack::new(&config)
            .unwrap()
            .deploy(&provider, &outputs)
            .await
            .unwrap();

        let owner = output.user("dossierfacile-filigranefacile-prod").unwrap();
        let log = std::fs::read_to_string(dir.path().join("invocation.log")).unwrap();
        let mut lines = log.lines();
        let argv = lines.next().unwrap();
        assert!(argv.starts_with("s3api put-bucket-lifecycle-configuration"));
        assert!(argv.contains("--bucket dossierfacile-filigrane-prod"));
        assert!(argv.contains("--endpoint-url https://s3.eu-west-par.io.cloud.ovh.net"));
        assert!(argv.contains("--region eu-west-par"));
        assert_eq!(
            lines.next().unwrap(),
            format!("{} {}", owner.access_key_id, owner.secret_access_key)
        );
    }

    #[tokio::test]
    async fn test_should_reapply_lifecycle_on_every_deploy() {
        let dir = tempfile::tempdir().unwrap();
        let config = lifecycle_config(dir.path(), 0);
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        deploy_project(&config, &provider, &outputs).await.unwrap();

        let stack = DataStack::new(&config).unwrap();
        let first = stack.deploy(&provider, &outputs).await.unwrap();
        let second = stack.deploy(&provider, &outputs).await.unwrap();
        assert_eq!(first, second);

        let log = std::fs::read_to_string(dir.path().join("invocation.log")).unwrap();
        let runs: Vec<&str> = log
            .lines()
            .filter(|line| line.starts_with("s3api put-bucket-lifecycle-configuration"))
            .collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], runs[1]);
    }

    #[tokio::test]
    async fn test_should_abort_deploy_on_lifecycle_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = lifecycle_config(dir.path(), 3);
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        deploy_project(&config, &provider, &outputs).await.unwrap();

        let stack = DataStack::new(&config).unwrap();
        let err = stack.deploy(&provider, &outputs).await.unwrap_err();
        match err {
            DeployError::Lifecycle(LifecycleError::CommandFailed { bucket, stderr, .. }) => {
                assert_eq!(bucket, "dossierfacile-filigrane-prod");
                assert_eq!(stderr, "failing");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(get_data_stack_output(&outputs, "organization", stack.environment()).is_err());
    }

    #[tokio::test]
    async fn test_should_abort_deploy_without_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = lifecycle_config(dir.path(), 0);
        config.lifecycle_file = dir.path().join("missing.json").display().to_string();
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        deploy_project(&config, &provider, &outputs).await.unwrap();

        let err = DataStack::new(&config)
            .unwrap()
            .deploy(&provider, &outputs)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::Lifecycle(LifecycleError::RuleFileMissing(_))
        ));
        assert!(!dir.path().join("invocation.log").exists());
    }
}
