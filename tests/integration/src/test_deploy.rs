//! Project + data stack deployments.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ovhstack_cloud::{LocalCloudProvider, ProviderError};
    use ovhstack_core::{FileOutputStore, InMemoryOutputStore, StackConfig, StackError};
    use ovhstack_iam_core::PermissionMatrix;
    use ovhstack_stacks::catalog::{BUCKET_PURPOSES, USER_PURPOSES};
    use ovhstack_stacks::{DataStack, DeployError, get_data_stack_output};

    use crate::{deploy_project, test_config};

    #[tokio::test]
    async fn test_should_export_one_entry_per_declared_resource() {
        let config = test_config("prod");
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        deploy_project(&config, &provider, &outputs).await.unwrap();

        let stack = DataStack::new(&config).unwrap();
        let output = stack.deploy(&provider, &outputs).await.unwrap();

        assert_eq!(output.storage_names().len(), BUCKET_PURPOSES.len());
        assert_eq!(output.s3_users().len(), USER_PURPOSES.len());
        let unique: HashSet<&str> = output
            .s3_users()
            .iter()
            .map(|u| u.user_name.as_str())
            .collect();
        assert_eq!(unique.len(), USER_PURPOSES.len());

        let read = get_data_stack_output(&outputs, "organization", stack.environment()).unwrap();
        assert_eq!(read, output);
    }

    #[tokio::test]
    async fn test_should_attach_policy_to_every_user() {
        let config = test_config("dev");
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        let project = deploy_project(&config, &provider, &outputs).await.unwrap();

        let stack = DataStack::new(&config).unwrap();
        stack.deploy(&provider, &outputs).await.unwrap();

        for (name, expected) in stack.policies().unwrap() {
            let user = provider.user(&project.project_id, &name).unwrap();
            assert_eq!(provider.policy(&user.id), Some(expected), "{name}");
        }
    }

    #[tokio::test]
    async fn test_should_reuse_identities_on_redeploy() {
        let config = test_config("dev");
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        deploy_project(&config, &provider, &outputs).await.unwrap();

        let stack = DataStack::new(&config).unwrap();
        let first = stack.deploy(&provider, &outputs).await.unwrap();
        let second = stack.deploy(&provider, &outputs).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.storage_count(), BUCKET_PURPOSES.len());
        assert_eq!(provider.user_count(), USER_PURPOSES.len());
    }

    #[tokio::test]
    async fn test_should_resume_from_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("provider.json");
        let outputs = FileOutputStore::new(dir.path().join("outputs"));
        let config = test_config("preprod");

        let provider = LocalCloudProvider::load(&snapshot).unwrap();
        let project = deploy_project(&config, &provider, &outputs).await.unwrap();
        provider.save(&snapshot).unwrap();

        let provider = LocalCloudProvider::load(&snapshot).unwrap();
        let again = deploy_project(&config, &provider, &outputs).await.unwrap();
        assert_eq!(again, project);

        let first = DataStack::new(&config)
            .unwrap()
            .deploy(&provider, &outputs)
            .await
            .unwrap();
        provider.save(&snapshot).unwrap();

        let provider = LocalCloudProvider::load(&snapshot).unwrap();
        let second = DataStack::new(&config)
            .unwrap()
            .deploy(&provider, &outputs)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_should_fail_fast_without_project_output() {
        let config = test_config("dev");
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();

        let err = DataStack::new(&config)
            .unwrap()
            .deploy(&provider, &outputs)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::MissingProjectId {
                source: StackError::OutputNotFound { .. },
                ..
            }
        ));
        assert_eq!(provider.storage_count(), 0);
        assert_eq!(provider.user_count(), 0);
    }

    #[tokio::test]
    async fn test_should_prefer_configured_project_id() {
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        let project = deploy_project(&test_config("dev"), &provider, &outputs)
            .await
            .unwrap();

        // A different environment has no project output; the configured id is used.
        let config = StackConfig::builder()
            .environment(Some("qa".to_owned()))
            .project_id(Some(project.project_id.clone()))
            .skip_lifecycle(true)
            .build();
        let output = DataStack::new(&config)
            .unwrap()
            .deploy(&provider, &outputs)
            .await
            .unwrap();
        assert!(output.storage_names()[0].ends_with("-qa"));
    }

    #[tokio::test]
    async fn test_should_reject_policy_on_unprovisioned_bucket() {
        let config = test_config("prod");
        let provider = LocalCloudProvider::new();
        let outputs = InMemoryOutputStore::new();
        deploy_project(&config, &provider, &outputs).await.unwrap();

        let mut matrix = PermissionMatrix::new();
        matrix
            .grant_parsed("api-tenant", "raw-file", &["get", "put"])
            .unwrap()
            .grant_parsed("api-tenant", "archive", &["get"])
            .unwrap();
        let stack = DataStack::with_catalog(
            &config,
            vec!["raw-file".to_owned(), "watermark".to_owned()],
            vec!["api-tenant".to_owned()],
            matrix,
        )
        .unwrap();

        let err = stack.deploy(&provider, &outputs).await.unwrap_err();
        match err {
            DeployError::Provider(ProviderError::Rejected { resource, reason }) => {
                assert_eq!(resource, "pdossierfacile-api-tenant-prod");
                assert!(reason.contains("dossierfacile-archive-prod"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Buckets created before the rejection stay in place.
        assert_eq!(provider.storage_count(), 2);
        assert!(get_data_stack_output(&outputs, "organization", stack.environment()).is_err());
    }
}
