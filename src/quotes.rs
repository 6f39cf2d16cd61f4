//! Motivational quotes and the random rotator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const BUILTIN: [(&str, &str); 10] = [
    (
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
    ),
    (
        "Believe you can and you're halfway there.",
        "Theodore Roosevelt",
    ),
    (
        "It does not matter how slowly you go as long as you do not stop.",
        "Confucius",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    (
        "The future belongs to those who believe in the beauty of their dreams.",
        "Eleanor Roosevelt",
    ),
    (
        "Strive not to be a success, but rather to be of value.",
        "Albert Einstein",
    ),
    (
        "The only limit to our realization of tomorrow will be our doubts of today.",
        "Franklin D. Roosevelt",
    ),
    (
        "Do what you can, with what you have, where you are.",
        "Theodore Roosevelt",
    ),
    (
        "Everything you've ever wanted is on the other side of fear.",
        "George Addair",
    ),
    (
        "Success is not how high you have climbed, but how you make a positive difference to the world.",
        "Roy T. Bennett",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// A non-empty list of quotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBook {
    quotes: Vec<Quote>,
}

impl QuoteBook {
    /// Returns `None` for an empty list.
    pub fn new(quotes: Vec<Quote>) -> Option<Self> {
        if quotes.is_empty() {
            None
        } else {
            Some(Self { quotes })
        }
    }

    pub fn builtin() -> Self {
        Self {
            quotes: BUILTIN
                .iter()
                .map(|(text, author)| Quote::new(*text, *author))
                .collect(),
        }
    }

    pub fn first(&self) -> &Quote {
        &self.quotes[0]
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[cfg(test)]
    pub fn contains(&self, quote: &Quote) -> bool {
        self.quotes.contains(quote)
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Picks quotes uniformly at random, with replacement
#[derive(Debug)]
pub struct QuoteRotator<R = StdRng> {
    book: QuoteBook,
    rng: R,
}

impl QuoteRotator<StdRng> {
    pub fn new(book: QuoteBook) -> Self {
        Self::with_rng(book, StdRng::from_os_rng())
    }
}

impl<R: Rng> QuoteRotator<R> {
    pub fn with_rng(book: QuoteBook, rng: R) -> Self {
        Self { book, rng }
    }

    pub fn book(&self) -> &QuoteBook {
        &self.book
    }

    pub fn next_quote(&mut self) -> &Quote {
        let index = self.rng.random_range(0..self.book.len());
        &self.book.quotes[index]
    }
}
