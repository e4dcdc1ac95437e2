#[cfg(test)]
mod test_engine_end_to_end;
