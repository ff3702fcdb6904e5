use std::collections::HashMap;
use std::path::Path;

use log::info;
use rs_tnt_core::model::capitalization::{Capitalization, CapitalizationAdapter, CapitalizationFilter, WordCap};
use rs_tnt_core::model::config::TaggerConfig;
use rs_tnt_core::model::known_word::KnownWordModel;
use rs_tnt_core::model::part_of_speech::PartOfSpeech;
use rs_tnt_core::model::suffix::SuffixModel;
use rs_tnt_core::model::tnt::TntModel;
use rs_tnt_core::model::transition::TagTrigramModel;

const MODEL_PATH: &str = "./data/model.bin";

/// Builds a tiny model in memory, used when no trained model is available.
fn toy_model() -> Result<TntModel, Box<dyn std::error::Error>> {
    use PartOfSpeech::*;

    // Tag transitions, interpolated with weights (unigram, bigram, trigram)
    let transition = TagTrigramModel::from_grams(
        [0.1, 0.3, 0.6],
        vec![
            (vec![Dt], 0.3),
            (vec![Nn], 0.3),
            (vec![Vbz], 0.2),
            (vec![Jj], 0.1),
            (vec![Nnp], 0.1),
            (vec![Bos, Dt], 0.7),
            (vec![Bos, Nnp], 0.3),
            (vec![Dt, Nn], 0.6),
            (vec![Dt, Jj], 0.4),
            (vec![Jj, Nn], 0.9),
            (vec![Nn, Vbz], 0.6),
            (vec![Nnp, Vbz], 0.7),
            (vec![Vbz, Eos], 0.8),
            (vec![Nn, Eos], 0.2),
        ],
    )?;

    // Known words: P(word | tag), looked up in lowercase
    let mut lexicon: HashMap<String, HashMap<PartOfSpeech, f64>> = HashMap::new();
    for (word, tag, probability) in [
        ("the", Dt, 0.6),
        ("a", Dt, 0.4),
        ("dog", Nn, 0.3),
        ("dog", Vbz, 0.01),
        ("cat", Nn, 0.2),
        ("barks", Vbz, 0.5),
        ("sleeps", Vbz, 0.4),
    ] {
        lexicon.entry(word.to_owned()).or_default().insert(tag, f64::ln(probability));
    }
    let known = KnownWordModel::new(lexicon, CapitalizationFilter::Any, CapitalizationAdapter::Fold);

    // Unknown words: scored by their suffix, "" being the fallback
    let mut suffixes: HashMap<String, HashMap<PartOfSpeech, f64>> = HashMap::new();
    for (suffix, tag, probability) in [
        ("", Nn, 0.5),
        ("", Jj, 0.2),
        ("", Nnp, 0.3),
        ("s", Vbz, 0.4),
        ("ous", Jj, 0.9),
        ("ful", Jj, 0.9),
    ] {
        suffixes.entry(suffix.to_owned()).or_default().insert(tag, f64::ln(probability));
    }

    // Capitalized unknown words get their own model...
    let proper_nouns = SuffixModel::new(
        suffixes.clone(),
        3,
        CapitalizationFilter::Only(vec![Capitalization::Capitalized]),
        CapitalizationAdapter::Identity,
    )?;
    // ...and every other unknown word falls back to this one
    let unknown = SuffixModel::new(suffixes, 3, CapitalizationFilter::Any, CapitalizationAdapter::Lowercase)?;

    Ok(TntModel::new(transition, vec![known.into(), proper_nouns.into(), unknown.into()]))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug to follow the decoding
    env_logger::init();

    // Load the trained model if there is one, otherwise use the toy model
    let model = if Path::new(MODEL_PATH).exists() {
        TntModel::load(MODEL_PATH)?
    } else {
        info!("No model at {MODEL_PATH}, using the toy model");
        toy_model()?
    };

    // Default configuration: beam ratio of 1000, one worker per CPU
    let mut config = TaggerConfig::default();

    // Keep at most 50 hypotheses per token
    config.set_max_beam_width(Some(50))?;

    // Invalid values are rejected
    match config.set_beam_ratio(0.5) {
        Ok(_) => println!("Should not happen"),
        Err(error) => println!("Beam ratio 0.5 is invalid: {error}"),
    }

    let tagger = model.into_tagger(config)?;

    // Tag a single sentence
    let words = ["The", "famous", "dog", "barks"];
    let tags = tagger.tag_words(&words)?;
    for (word, tag) in words.iter().zip(&tags) {
        println!("{word}/{tag}");
    }

    // Tag several sentences in parallel, results keep the input order
    let sentences: Vec<Vec<WordCap>> = ["a cat sleeps", "Rex barks", "the dog"]
        .iter()
        .map(|sentence| sentence.split_whitespace().map(WordCap::new).collect())
        .collect();
    for (sentence, tagged) in sentences.iter().zip(tagger.tag_sentences(&sentences)) {
        let words: Vec<&str> = sentence.iter().map(WordCap::word).collect();
        match tagged {
            Ok(tags) => {
                let tags: Vec<String> = tags.iter().map(PartOfSpeech::to_string).collect();
                println!("{} => {}", words.join(" "), tags.join(" "));
            }
            Err(error) => println!("{} => {error}", words.join(" ")),
        }
    }

    // Words no model can tag make the whole sentence fail
    let toy = toy_model()?;
    let lexicon_only = TntModel::new(toy.transition, toy.word_models.into_iter().take(1).collect());
    match lexicon_only.into_tagger(TaggerConfig::default())?.tag_words(&["the", "zork"]) {
        Ok(_) => println!("Should not happen"),
        Err(error) => println!("Without unknown word models: {error}"),
    }

    Ok(())
}
