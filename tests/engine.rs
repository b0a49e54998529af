use cutout::engine::*;
use std::ffi::OsString;

#[test]
fn default_options_use_isnet_and_auto_provider() {
    let options = EngineOptions::default();
    assert_eq!(options.model_url, DEFAULT_MODEL_URL);
    assert_eq!(options.provider, Provider::Auto);
}

#[test]
fn options_forward_as_child_arguments() {
    let options = EngineOptions {
        model_url: "https://huggingface.co/imgly/isnet-general-onnx".into(),
        provider: Provider::Cpu,
    };
    let args: Vec<OsString> = options.to_args();
    assert_eq!(
        args,
        vec![
            OsString::from("--model"),
            OsString::from("https://huggingface.co/imgly/isnet-general-onnx"),
            OsString::from("--provider"),
            OsString::from("cpu"),
        ]
    );
}

#[test]
fn provider_names_match_cli_values() {
    use clap::ValueEnum;
    for provider in Provider::value_variants() {
        let name = provider.to_possible_value().unwrap();
        assert_eq!(name.get_name(), provider.as_str());
    }
}
