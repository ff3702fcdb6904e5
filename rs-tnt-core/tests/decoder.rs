use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rs_tnt_core::model::ancestor::Ancestor;
use rs_tnt_core::model::capitalization::{CapitalizationAdapter, CapitalizationFilter, WordCap};
use rs_tnt_core::model::config::TaggerConfig;
use rs_tnt_core::model::known_word::KnownWordModel;
use rs_tnt_core::model::part_of_speech::PartOfSpeech::{self, Bbs, Bos, Dt, Eos, Jj, Nn, Vb};
use rs_tnt_core::model::tagger::Tagger;
use rs_tnt_core::model::transition::{TagTrigramModel, TransitionModel};
use rs_tnt_core::model::viterbi::Beam;
use rs_tnt_core::model::word_model::WordModel;

const TAGS: [PartOfSpeech; 4] = [Dt, Nn, Vb, Jj];
const VOCABULARY: [&str; 5] = ["w0", "w1", "w2", "w3", "w4"];

/// Random model where every transition is possible and every word may take
/// a random, non-empty subset of the tags.
fn random_model(rng: &mut StdRng) -> (TagTrigramModel, KnownWordModel) {
	let mut grams = Vec::new();
	let previous: Vec<PartOfSpeech> = [Bbs, Bos].into_iter().chain(TAGS).collect();
	let next: Vec<PartOfSpeech> = TAGS.into_iter().chain([Eos]).collect();
	for &t3 in &next {
		grams.push((vec![t3], rng.random_range(0.05..1.0)));
		for &t2 in &previous {
			grams.push((vec![t2, t3], rng.random_range(0.05..1.0)));
			for &t1 in &previous {
				grams.push((vec![t1, t2, t3], rng.random_range(0.05..1.0)));
			}
		}
	}
	let transitions = TagTrigramModel::from_grams([0.1, 0.3, 0.6], grams).unwrap();

	let mut lexicon: HashMap<String, HashMap<PartOfSpeech, f64>> = HashMap::new();
	for word in VOCABULARY {
		let probabilities = lexicon.entry(word.to_owned()).or_default();
		for tag in TAGS {
			if rng.random_bool(0.6) {
				probabilities.insert(tag, rng.random_range(0.01f64..1.0).ln());
			}
		}
		if probabilities.is_empty() {
			probabilities.insert(TAGS[rng.random_range(0..TAGS.len())], rng.random_range(0.01f64..1.0).ln());
		}
	}
	let known = KnownWordModel::new(lexicon, CapitalizationFilter::Any, CapitalizationAdapter::Identity);

	(transitions, known)
}

/// Log probability of a complete tagging, end of sentence included.
fn score(
	transitions: &TagTrigramModel,
	known: &KnownWordModel,
	sentence: &[WordCap],
	tags: &[PartOfSpeech],
) -> f64 {
	use rs_tnt_core::model::word_model::WordProbabilityModel;

	let mut context = vec![Bbs, Bos];
	let mut total = 0.0;
	for (word_cap, &tag) in sentence.iter().zip(tags) {
		total += transitions.log_probability_of(tag, &context[context.len() - 2..]);
		total += known.log_probability_of_word(tag, word_cap);
		context.push(tag);
	}
	total + transitions.log_probability_of(Eos, &context[context.len() - 2..])
}

/// Best score over every possible tag sequence.
fn exhaustive_best(transitions: &TagTrigramModel, known: &KnownWordModel, sentence: &[WordCap]) -> f64 {
	let sequences = TAGS.len().pow(sentence.len() as u32);
	(0..sequences)
		.map(|mut code| {
			let tags: Vec<PartOfSpeech> = (0..sentence.len())
				.map(|_| {
					let tag = TAGS[code % TAGS.len()];
					code /= TAGS.len();
					tag
				})
				.collect();
			score(transitions, known, sentence, &tags)
		})
		.fold(f64::NEG_INFINITY, f64::max)
}

#[test]
fn test_beam_without_pruning_is_optimal() {
	let mut rng = StdRng::seed_from_u64(0x7a66);

	for _ in 0..40 {
		let (transitions, known) = random_model(&mut rng);
		let length = rng.random_range(1..=5);
		let sentence: Vec<WordCap> = (0..length)
			.map(|_| WordCap::new(VOCABULARY[rng.random_range(0..VOCABULARY.len())]))
			.collect();

		let tagger = Tagger::new(
			transitions.clone(),
			vec![WordModel::from(known.clone())],
			TaggerConfig::exhaustive(),
		)
		.unwrap();
		let tags = tagger.tag_sentence(&sentence).unwrap();

		assert_eq!(tags.len(), sentence.len());
		let best = exhaustive_best(&transitions, &known, &sentence);
		let found = score(&transitions, &known, &sentence, &tags);
		assert!((best - found).abs() < 1e-9, "beam found {found}, exhaustive search {best}");
	}
}

#[test]
fn test_beam_bounded_by_distinct_contexts() {
	let mut rng = StdRng::seed_from_u64(11);
	let initial: Ancestor<PartOfSpeech> = Ancestor::create_initial([Bbs, Bos]).unwrap();
	let mut beam = Beam::new(initial, 2);

	for _ in 0..8 {
		let increments: Vec<(f64, PartOfSpeech)> =
			TAGS.iter().map(|&tag| (rng.random_range(0.01f64..1.0).ln(), tag)).collect();
		beam.advance(|_| increments.clone()).unwrap();

		let contexts: HashSet<_> = beam.ancestors().iter().map(|ancestor| ancestor.get_ngram(2)).collect();
		assert_eq!(contexts.len(), beam.len());
		assert!(beam.len() <= TAGS.len() * TAGS.len());
	}
}

#[test]
fn test_pruning_bounds_beam_width() {
	let mut rng = StdRng::seed_from_u64(3);
	let (transitions, known) = random_model(&mut rng);

	let mut config = TaggerConfig::default();
	config.set_max_beam_width(Some(1)).unwrap();
	let tagger = Tagger::new(transitions, vec![WordModel::from(known)], config).unwrap();

	// Greedy decoding still produces one tag per token.
	let tags = tagger.tag_words(&["w0", "w1", "w2", "w3", "w4"]).unwrap();
	assert_eq!(tags.len(), 5);
	assert!(tags.iter().all(|tag| TAGS.contains(tag)));
}
