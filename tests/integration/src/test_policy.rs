//! Policy derivation from the permission matrix.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ovhstack_core::Environment;
    use ovhstack_iam_core::{PermissionMatrix, compile_all, compile_policy};
    use ovhstack_iam_model::{S3Action, bucket_arn_pair};
    use ovhstack_s3_core::{NamingError, NamingResolver};
    use ovhstack_stacks::DataStack;
    use ovhstack_stacks::catalog::default_permissions;

    use crate::test_config;

    #[test]
    fn test_should_emit_one_statement_per_granted_bucket() {
        let config = test_config("prod");
        let stack = DataStack::new(&config).unwrap();
        let matrix = default_permissions().unwrap();
        let policies = stack.policies().unwrap();
        let naming = NamingResolver::new("dossierfacile").unwrap();
        let env = Environment::new("prod").unwrap();

        for (user, row) in matrix.iter() {
            let doc = &policies[&naming.name(&env, user).unwrap()];
            assert_eq!(doc.statements.len(), row.len(), "{user}");
            for statement in &doc.statements {
                let bucket = statement.buckets().unwrap()[0].to_owned();
                let (purpose, _) = naming.parse(&bucket).unwrap();
                let expected: BTreeSet<S3Action> = row[purpose].iter().collect();
                let actual: BTreeSet<S3Action> = statement.action.iter().collect();
                assert_eq!(actual, expected, "{user} on {bucket}");
            }
        }
    }

    #[test]
    fn test_should_compile_byte_identical_documents() {
        let config = test_config("dev");
        let first = DataStack::new(&config).unwrap().policies().unwrap();
        let second = DataStack::new(&config).unwrap().policies().unwrap();
        for (user, doc) in &first {
            assert_eq!(doc.to_json().unwrap(), second[user].to_json().unwrap());
        }
    }

    #[test]
    fn test_should_compile_empty_row_to_empty_document() {
        let mut matrix = PermissionMatrix::new();
        matrix.add_user("bo");
        let policies = compile_all(&matrix);
        assert!(policies["bo"].is_empty());
        assert_eq!(
            policies["bo"].to_json().unwrap(),
            r#"{"Version":"2012-10-17","Statement":[]}"#
        );
    }

    #[test]
    fn test_should_scope_single_bucket_grant() {
        let naming = NamingResolver::new("dossierfacile").unwrap();
        let env = Environment::new("prod").unwrap();
        let declared = naming
            .bucket_names(&env, &["raw-file", "watermark"])
            .unwrap();

        let mut matrix = PermissionMatrix::new();
        matrix
            .grant_parsed("apiTenant", "raw-file", &["get", "put"])
            .unwrap();
        let resolved = matrix
            .resolve(
                |user| Ok::<_, NamingError>(user.to_owned()),
                |bucket| naming.bucket_name(&env, bucket),
            )
            .unwrap();

        let doc = compile_policy("apiTenant", resolved.row("apiTenant").unwrap());
        assert_eq!(doc.statements.len(), 1);
        let statement = &doc.statements[0];
        assert_eq!(
            statement.resource,
            bucket_arn_pair(&declared[0]).to_vec()
        );
        assert_eq!(
            statement.action.as_slice(),
            &[S3Action::GetObject, S3Action::PutObject]
        );
        assert!(!doc.to_json().unwrap().contains("watermark"));
    }

    #[test]
    fn test_should_compile_grant_on_undeclared_bucket() {
        let config = test_config("prod");
        let mut matrix = PermissionMatrix::new();
        matrix.grant_parsed("bo", "archive", &["get", "list"]).unwrap();
        let stack = DataStack::with_catalog(
            &config,
            vec!["raw-file".to_owned()],
            vec!["bo".to_owned()],
            matrix,
        )
        .unwrap();

        let plan = stack.plan().unwrap();
        let doc = &plan.policies["dossierfacile-bo-prod"];
        assert_eq!(doc.statements.len(), 1);
        assert_eq!(
            doc.statements[0].buckets().unwrap(),
            vec!["dossierfacile-archive-prod"]
        );
        assert_eq!(plan.warnings.len(), 1);
    }
}
