//! Mapping of domain errors to RFC 9457 Problem responses.

use bookshelf_problem::{Problem, Violation, bad_request, not_found, unprocessable};

use crate::domain::error::DomainError;

/// Map a domain error to a Problem, tagging it with the request path.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    match e {
        DomainError::BookNotFound { id } => {
            not_found(format!("Book {id} was not found")).with_instance(instance)
        }
        DomainError::CategoryNotFound { id } => {
            not_found(format!("Category {id} was not found")).with_instance(instance)
        }
        DomainError::PriceOutOfRange { .. } => unprocessable(e.to_string())
            .with_code("PRICE_OUT_OF_RANGE")
            .with_violations(vec![Violation {
                field: "price".to_owned(),
                message: e.to_string(),
            }])
            .with_instance(instance),
        DomainError::EmptyTitle | DomainError::TitleTooLong { .. } => unprocessable(e.to_string())
            .with_violations(vec![Violation {
                field: "title".to_owned(),
                message: e.to_string(),
            }])
            .with_instance(instance),
        DomainError::InvalidPriceFilter { .. } | DomainError::InvalidPageRequest { .. } => {
            bad_request(e.to_string()).with_instance(instance)
        }
    }
}
