use edsdk::{Result, Sdk};

fn main() -> Result<()> {
  let sdk = Sdk::new()?;

  for camera in sdk.camera_list()?.iter()? {
    let info = camera?.device_info()?;
    println!("{} ({})", info.description, info.port_name);
  }

  Ok(())
}
