//! Naming across environments.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ovhstack_core::Environment;
    use ovhstack_s3_core::NamingResolver;
    use ovhstack_stacks::catalog::{BUCKET_PURPOSES, USER_PURPOSES};

    fn all_names(naming: &NamingResolver, env: &str) -> HashSet<String> {
        let env = Environment::new(env).unwrap();
        let mut names: HashSet<String> = naming
            .bucket_names(&env, &BUCKET_PURPOSES[..])
            .unwrap()
            .into_iter()
            .collect();
        names.extend(naming.user_names(&env, &USER_PURPOSES[..]).unwrap());
        names
    }

    #[test]
    fn test_should_keep_environment_name_sets_disjoint() {
        let naming = NamingResolver::new("dossierfacile").unwrap();
        let envs = ["dev", "preprod", "prod", "prod2", "demo"];
        for (i, a) in envs.iter().enumerate() {
            for b in &envs[i + 1..] {
                let left = all_names(&naming, a);
                let right = all_names(&naming, b);
                assert!(left.is_disjoint(&right), "{a} and {b} collide");
            }
        }
    }

    #[test]
    fn test_should_resolve_all_catalog_buckets_to_valid_names() {
        let naming = NamingResolver::new("dossierfacile").unwrap();
        let env = Environment::new("preprod").unwrap();
        let names = naming.bucket_names(&env, &BUCKET_PURPOSES[..]).unwrap();
        assert_eq!(names.len(), BUCKET_PURPOSES.len());
        for (name, purpose) in names.iter().zip(BUCKET_PURPOSES) {
            assert_eq!(naming.parse(name), Some((purpose, "preprod")));
        }
    }
}
