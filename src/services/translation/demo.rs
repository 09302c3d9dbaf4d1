//! Terminal link of the translation chain: canned phrases, never fails.

use async_trait::async_trait;

use super::TranslationProvider;
use crate::utils::common::truncate_chars;

const CANNED_TRANSLATIONS: &[(&str, &str)] = &[
    (
        "vi",
        "Chào mừng bạn đến với video YouTube này! Hôm nay chúng ta sẽ khám phá một chủ đề tuyệt vời sẽ giúp bạn học điều gì đó mới. Đây là một minh họa về extension lồng tiếng AI của chúng tôi có thể dịch và tạo lồng tiếng cho bất kỳ video YouTube nào.",
    ),
    (
        "ja",
        "このYouTubeビデオへようこそ！今日は、あなたが何か新しいことを学ぶのに役立つ素晴らしいトピックを探求します。これは、任意のYouTubeビデオを翻訳して音声を作成できるAIダビング拡張機能のデモンストレーションです。",
    ),
    (
        "ko",
        "이 YouTube 비디오에 오신 것을 환영합니다! 오늘 우리는 당신이 새로운 것을 배우는 데 도움이 될 놀라운 주제를 탐구할 것입니다. 이것은 모든 YouTube 비디오를 번역하고 음성을 만들 수 있는 AI 더빙 확장 프로그램의 데모입니다.",
    ),
];

const ECHO_CHARS: usize = 100;

/// Canned phrase for vi/ja/ko, otherwise a truncated echo tagged with the code.
pub fn demo_translation(text: &str, target_lang: &str) -> String {
    CANNED_TRANSLATIONS
        .iter()
        .find(|(code, _)| *code == target_lang)
        .map(|(_, phrase)| phrase.to_string())
        .unwrap_or_else(|| {
            format!(
                "Demo translation to {}: {}...",
                target_lang,
                truncate_chars(text, ECHO_CHARS)
            )
        })
}

pub struct CannedTranslation;

#[async_trait]
impl TranslationProvider for CannedTranslation {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn attempt(&self, text: &str, target_lang: &str) -> Option<String> {
        Some(demo_translation(text, target_lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_phrases() {
        assert!(demo_translation("anything", "vi").starts_with("Chào mừng bạn"));
        assert!(demo_translation("anything", "ja").starts_with("このYouTube"));
        assert!(demo_translation("anything", "ko").starts_with("이 YouTube"));
    }

    #[test]
    fn test_echo_for_other_languages() {
        assert_eq!(demo_translation("Hello world", "fr"), "Demo translation to fr: Hello world...");
        let long = "x".repeat(250);
        let echoed = demo_translation(&long, "de");
        assert_eq!(echoed, format!("Demo translation to de: {}...", "x".repeat(100)));
        assert!(!demo_translation("", "").is_empty());
    }
}
