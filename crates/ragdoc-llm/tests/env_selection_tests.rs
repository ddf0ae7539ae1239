use ragdoc_core::config::GenerationConfig;
use ragdoc_core::traits::Generator;
use ragdoc_llm::get_default_generator;

#[tokio::test]
async fn fake_generation_flag_selects_fake_backend() {
    // Force the offline backend so no network call is made
    std::env::set_var("APP_USE_FAKE_GENERATION", "1");

    let generator = get_default_generator(&GenerationConfig::default()).expect("generator");
    assert_eq!(generator.id(), "fake");
    let answer = generator.generate("anything", &["some passage".to_string()]).await.unwrap();
    assert!(answer.contains("1 passage(s)"));

    std::env::set_var("APP_USE_FAKE_GENERATION", "0");
    let generator = get_default_generator(&GenerationConfig::default()).expect("generator");
    assert_eq!(generator.id(), "chat:Qwen/Qwen2.5-72B-Instruct");
}
