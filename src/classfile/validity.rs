pub trait Validity {
  fn valid(&self) -> bool;
}
