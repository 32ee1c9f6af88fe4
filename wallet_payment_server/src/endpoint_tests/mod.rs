mod helpers;
mod mocks;
mod wallet;
