mod stub;

mod metadata;
mod resolve;
