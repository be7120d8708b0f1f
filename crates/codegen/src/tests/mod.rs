//! Tests for SDK code generation

use super::*;


#[cfg(test)]
mod generation_tests {
    use super::*;

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::new(Language::Go, SdkMode::OffChain);

        assert_eq!(config.destination, PathBuf::from("cpm_out/offchain/go/"));
        assert!(config.script_hash.is_zero());
        assert!(config.namespace.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_generation_config_builders() {
        let hash: ScriptHash = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5".parse().unwrap();
        let config = GenerationConfig::new(Language::CSharp, SdkMode::OnChain)
            .with_destination("sdk/csharp")
            .with_script_hash(hash)
            .with_namespace("Acme");

        assert_eq!(config.destination, PathBuf::from("sdk/csharp"));
        assert_eq!(config.script_hash, hash);
        assert_eq!(config.namespace.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_default_destinations() {
        assert_eq!(default_destination(Language::Python, SdkMode::OnChain), "cpm_out/onchain/python/");
        assert_eq!(default_destination(Language::TypeScript, SdkMode::OffChain), "cpm_out/offchain/ts/");
    }

    #[test]
    fn test_unsupported_combination_writes_nothing() {
        let manifest = Manifest::from_json(r#"{"name": "X", "abi": {"methods": [], "events": []}}"#).unwrap();
        let config = GenerationConfig::new(Language::TypeScript, SdkMode::OnChain);
        let mut sink = MemorySink::new();

        let err = generate_sdk(&manifest, &config, &mut sink).unwrap_err();
        assert!(matches!(err, cpm_core::Error::Config(_)));
        assert!(sink.is_empty());
    }
}
